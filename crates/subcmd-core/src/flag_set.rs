use std::{
    any::Any,
    collections::BTreeMap,
    fmt::Write as _,
    io::{self, Write},
    str::FromStr,
};

use clap::{Arg, ArgAction, ArgMatches, builder::BoolishValueParser, parser::ValueSource};
use tap::TapFallible;
use tracing::{debug, trace, warn};

use crate::{Flag, FlagError, FlagKind};

/// A set of named flags, parsed from the front of an argument list.
///
/// Flags may be written with one or two leading dashes (`-bye`, `--bye`), with their value
/// attached (`-n=3`) or, for non-bool flags, as the following argument (`-n 3`). Parsing stops
/// at the first positional argument, at a lone `-`, or after a `--` terminator.
#[derive(Clone, Debug)]
pub struct FlagSet {
    name: String,
    flags: BTreeMap<String, Flag>,
    matches: Option<ArgMatches>,
    args: Vec<String>,
}

impl FlagSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flags: BTreeMap::new(),
            matches: None,
            args: Vec::new(),
        }
    }

    pub fn with_flag(mut self, flag: Flag) -> Self {
        self.add_flag(flag);
        self
    }

    pub fn add_flag(&mut self, flag: Flag) {
        if self.flags.contains_key(&flag.name) {
            warn!(flag_set = %self.name, flag = %flag.name, "flag redefined");
        }
        self.flags.insert(flag.name.clone(), flag);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Visits every registered flag in lexical order.
    pub fn flags(&self) -> impl Iterator<Item = &Flag> {
        self.flags.values()
    }

    pub fn lookup(&self, name: &str) -> Option<&Flag> {
        self.flags.get(name)
    }

    pub fn has_flags(&self) -> bool {
        !self.flags.is_empty()
    }

    /// Parses flags from the front of `args`, returning the remaining positional arguments.
    pub fn parse<I, T>(&mut self, args: I) -> Result<Vec<String>, FlagError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.matches = None;
        self.args.clear();

        let (tokens, positional) = self.split(args.into_iter().map(Into::into))?;
        trace!(flag_set = %self.name, ?tokens, ?positional, "Parsing flags");

        let matches = self
            .to_command()
            .try_get_matches_from(tokens)
            .map_err(FlagError::from_clap)
            .tap_err(|e| debug!(flag_set = %self.name, "Flag parsing failed: {e}"))?;

        self.matches = Some(matches);
        self.args.clone_from(&positional);
        Ok(positional)
    }

    /// Positional arguments left over from the last call to [`FlagSet::parse`].
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<String> {
        self.get(name)
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name)
    }

    pub fn get_uint(&self, name: &str) -> Option<u64> {
        self.get(name)
    }

    pub fn get_float(&self, name: &str) -> Option<f64> {
        self.get(name)
    }

    /// Whether the flag was given on the command line during the last parse.
    pub fn is_set(&self, name: &str) -> bool {
        if !self.flags.contains_key(name) {
            return false;
        }
        self.matches
            .as_ref()
            .and_then(|m| m.value_source(name))
            .is_some_and(|source| source == ValueSource::CommandLine)
    }

    /// Renders each flag's name, value type, help text and non-zero default.
    pub fn defaults(&self) -> String {
        let mut out = String::new();
        for flag in self.flags.values() {
            let (value_name, help) = flag.unquote_usage();
            let mut line = format!("  -{}", flag.name);
            if !value_name.is_empty() {
                line.push(' ');
                line.push_str(&value_name);
            }
            // Single-letter bool flags keep their help on the same line.
            if line.len() <= 4 {
                line.push('\t');
            } else {
                line.push_str("\n    \t");
            }
            line.push_str(&help.replace('\n', "\n    \t"));
            if !flag.is_zero_default() {
                match flag.kind {
                    FlagKind::String => {
                        let _ = write!(line, " (default {:?})", flag.default);
                    }
                    _ => {
                        let _ = write!(line, " (default {})", flag.default);
                    }
                }
            }
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    pub fn print_defaults(&self, w: &mut impl Write) -> io::Result<()> {
        w.write_all(self.defaults().as_bytes())
    }

    fn get<T>(&self, name: &str) -> Option<T>
    where
        T: Any + Clone + Send + Sync + FromStr + 'static,
    {
        match &self.matches {
            Some(matches) => matches.try_get_one::<T>(name).ok().flatten().cloned(),
            None => self.flags.get(name)?.default.parse().ok(),
        }
    }

    /// Separates the leading flags from the positional arguments, normalizing each flag to the
    /// `--name[=value]` form understood by clap.
    fn split(
        &self,
        mut args: impl Iterator<Item = String>,
    ) -> Result<(Vec<String>, Vec<String>), FlagError> {
        let mut tokens = Vec::new();
        let mut positional = Vec::new();

        while let Some(arg) = args.next() {
            if arg.len() < 2 || !arg.starts_with('-') {
                positional.push(arg);
                break;
            }
            let trimmed = match arg.strip_prefix("--") {
                Some("") => break,
                Some(rest) => rest,
                None => &arg[1..],
            };
            if trimmed.starts_with('-') || trimmed.starts_with('=') {
                return Err(FlagError::BadSyntax(arg));
            }
            let (name, value) = match trimmed.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (trimmed, None),
            };
            let Some(flag) = self.flags.get(name) else {
                if name == "h" || name == "help" {
                    return Err(FlagError::HelpRequested);
                }
                return Err(FlagError::Undefined(name.to_owned()));
            };
            let token = match value {
                Some(value) => format!("--{name}={value}"),
                None if flag.is_bool() => format!("--{name}"),
                None => {
                    let value = args
                        .next()
                        .ok_or_else(|| FlagError::MissingValue(name.to_owned()))?;
                    format!("--{name}={value}")
                }
            };
            tokens.push(token);
        }

        positional.extend(args);
        Ok((tokens, positional))
    }

    fn to_command(&self) -> clap::Command {
        let mut command = clap::Command::new(self.name.clone())
            .no_binary_name(true)
            .disable_help_flag(true)
            .disable_version_flag(true)
            .args_override_self(true);
        for flag in self.flags.values() {
            command = command.arg(to_arg(flag));
        }
        command
    }
}

fn to_arg(flag: &Flag) -> Arg {
    let arg = Arg::new(flag.name.clone())
        .long(flag.name.clone())
        .action(ArgAction::Set)
        .default_value(flag.default.clone());

    match flag.kind {
        FlagKind::Bool => arg
            .num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true")
            .value_parser(BoolishValueParser::new()),
        FlagKind::String => arg.value_parser(clap::value_parser!(String)),
        FlagKind::Int => arg.value_parser(clap::value_parser!(i64)),
        FlagKind::Uint => arg.value_parser(clap::value_parser!(u64)),
        FlagKind::Float => arg.value_parser(clap::value_parser!(f64)),
    }
}

#[cfg(test)]
#[path = "./flag_set_test.rs"]
mod flag_set_test;
