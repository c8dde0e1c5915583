use std::{
    io::{self, Write},
    sync::Arc,
};

use derivative::Derivative;

use crate::{ActionError, Flag, FlagSet};

pub type Action = dyn Fn(&Command, &[String]) -> Result<(), ActionError> + Send + Sync;

/// A subcommand, or a documentation-only help topic when it has no action.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct Command {
    #[derivative(Debug = "ignore")]
    action: Option<Arc<Action>>,
    usage_line: String,
    short: String,
    long: String,
    flags: FlagSet,
    global_flags: Option<FlagSet>,
}

impl Command {
    /// Creates a command from its one-line usage message. The first word of the line is the
    /// command's name; the rest documents its arguments.
    pub fn new(usage_line: impl Into<String>) -> Self {
        let usage_line = usage_line.into();
        let flags = FlagSet::new(name_of(&usage_line));
        Self {
            action: None,
            usage_line,
            short: String::new(),
            long: String::new(),
            flags,
            global_flags: None,
        }
    }

    pub fn with_short(self, short: impl Into<String>) -> Self {
        Self {
            short: short.into(),
            ..self
        }
    }

    /// Sets the text shown by `help <command>`. Leading and trailing whitespace is trimmed when
    /// displayed.
    pub fn with_long(self, long: impl Into<String>) -> Self {
        Self {
            long: long.into(),
            ..self
        }
    }

    pub fn with_action<F>(self, action: F) -> Self
    where
        F: Fn(&Command, &[String]) -> Result<(), ActionError> + Send + Sync + 'static,
    {
        Self {
            action: Some(Arc::new(action)),
            ..self
        }
    }

    pub fn with_flag(mut self, flag: Flag) -> Self {
        self.flags.add_flag(flag);
        self
    }

    pub fn with_flags(self, flags: FlagSet) -> Self {
        Self { flags, ..self }
    }

    pub fn name(&self) -> &str {
        name_of(&self.usage_line)
    }

    pub fn usage_line(&self) -> &str {
        &self.usage_line
    }

    pub fn short(&self) -> &str {
        &self.short
    }

    pub fn long(&self) -> &str {
        &self.long
    }

    /// Commands without an action are help topics: they're listed separately and can only be
    /// reached through `help`.
    pub fn runnable(&self) -> bool {
        self.action.is_some()
    }

    pub fn has_flags(&self) -> bool {
        self.flags.has_flags()
    }

    pub fn flags(&self) -> &FlagSet {
        &self.flags
    }

    pub fn flags_mut(&mut self) -> &mut FlagSet {
        &mut self.flags
    }

    /// The program-wide flags parsed for the current invocation, if any were defined.
    pub fn global_flags(&self) -> Option<&FlagSet> {
        self.global_flags.as_ref()
    }

    pub fn set_global_flags(&mut self, global_flags: FlagSet) {
        self.global_flags = Some(global_flags);
    }

    /// Signals that the command's arguments are invalid. Return it from the action to show this
    /// command's usage screen and exit with status 2.
    pub fn usage(&self) -> ActionError {
        ActionError::Usage
    }

    /// Runs the action with the positional arguments left after flag parsing.
    pub fn run(&self, args: &[String]) -> Result<(), ActionError> {
        match &self.action {
            Some(action) => action(self, args),
            None => Ok(()),
        }
    }

    pub fn print_usage(&self, w: &mut impl Write) -> io::Result<()> {
        w.write_all(self.usage_text().as_bytes())
    }

    pub fn usage_text(&self) -> String {
        let mut out = String::new();
        if self.runnable() {
            out.push_str(&format!("usage: {}\n\n", self.usage_line));
            if self.has_flags() {
                out.push_str(&self.flags.defaults());
                out.push('\n');
            }
        }
        out.push_str(self.long.trim());
        out.push('\n');
        out
    }
}

fn name_of(usage_line: &str) -> &str {
    match usage_line.find(' ') {
        Some(i) => &usage_line[..i],
        None => usage_line,
    }
}

#[cfg(test)]
#[path = "./command_test.rs"]
mod command_test;
