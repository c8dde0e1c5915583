use strum::{Display, EnumString};

/// The value type of a [`Flag`].
#[derive(Display, Clone, Copy, PartialEq, Eq, Hash, Debug, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum FlagKind {
    Bool,
    String,
    Int,
    Uint,
    Float,
}

impl FlagKind {
    fn zero_value(&self) -> &'static str {
        match self {
            FlagKind::Bool => "false",
            FlagKind::String => "",
            FlagKind::Int | FlagKind::Uint | FlagKind::Float => "0",
        }
    }
}

/// A single named flag definition: its value type, its default, and the help text shown in usage
/// output.
#[derive(Clone, PartialEq, Debug)]
pub struct Flag {
    pub name: String,
    pub kind: FlagKind,
    pub default: String,
    pub help: String,
}

impl Flag {
    pub fn new(
        name: impl Into<String>,
        kind: FlagKind,
        default: impl Into<String>,
        help: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            default: default.into(),
            help: help.into(),
        }
    }

    pub fn bool(name: impl Into<String>, default: bool, help: impl Into<String>) -> Self {
        Self::new(name, FlagKind::Bool, default.to_string(), help)
    }

    pub fn string(
        name: impl Into<String>,
        default: impl Into<String>,
        help: impl Into<String>,
    ) -> Self {
        Self::new(name, FlagKind::String, default, help)
    }

    pub fn int(name: impl Into<String>, default: i64, help: impl Into<String>) -> Self {
        Self::new(name, FlagKind::Int, default.to_string(), help)
    }

    pub fn uint(name: impl Into<String>, default: u64, help: impl Into<String>) -> Self {
        Self::new(name, FlagKind::Uint, default.to_string(), help)
    }

    pub fn float(name: impl Into<String>, default: f64, help: impl Into<String>) -> Self {
        Self::new(name, FlagKind::Float, default.to_string(), help)
    }

    pub fn is_bool(&self) -> bool {
        self.kind == FlagKind::Bool
    }

    pub fn is_zero_default(&self) -> bool {
        if self.kind == FlagKind::Float {
            return self.default.parse::<f64>().is_ok_and(|v| v == 0.0);
        }
        self.default == self.kind.zero_value()
    }

    /// Extracts a back-quoted value name from the help text, returning it along with the help
    /// text stripped of the quotes. Without quotes the value name is the kind's name, or empty
    /// for bool flags.
    pub fn unquote_usage(&self) -> (String, String) {
        if let Some(start) = self.help.find('`') {
            if let Some(len) = self.help[start + 1..].find('`') {
                let end = start + 1 + len;
                let name = self.help[start + 1..end].to_owned();
                let help = format!(
                    "{}{}{}",
                    &self.help[..start],
                    name,
                    &self.help[end + 1..]
                );
                return (name, help);
            }
        }
        let name = match self.kind {
            FlagKind::Bool => String::new(),
            kind => kind.to_string(),
        };
        (name, self.help.clone())
    }
}
