use std::collections::HashSet;

use subcmd_core::{Command, Flag, FlagSet};
use thiserror::Error;
use tracing::warn;

use crate::Program;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("program name must not be empty")]
    EmptyProgramName,
    #[error("command {index} has no name: usage line {usage_line:?} must start with one")]
    EmptyCommandName { index: usize, usage_line: String },
}

pub struct Builder {
    pub(crate) name: String,
    pub(crate) short: String,
    pub(crate) commands: Vec<Command>,
    pub(crate) global_flags: FlagSet,
}

impl Builder {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            global_flags: FlagSet::new(name.clone()),
            name,
            short: String::new(),
            commands: Vec::new(),
        }
    }

    pub fn with_short(mut self, short: impl Into<String>) -> Self {
        self.short = short.into();
        self
    }

    /// Adds a command or help topic. Commands are listed by `help` in the order they're added.
    pub fn with_command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    pub fn with_commands(mut self, commands: impl IntoIterator<Item = Command>) -> Self {
        self.commands.extend(commands);
        self
    }

    /// Adds a flag accepted before the command name.
    pub fn with_global_flag(mut self, flag: Flag) -> Self {
        self.global_flags.add_flag(flag);
        self
    }

    pub fn with_global_flags(mut self, global_flags: FlagSet) -> Self {
        self.global_flags = global_flags;
        self
    }

    pub fn build(self) -> Result<Program, ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::EmptyProgramName);
        }

        let mut seen = HashSet::new();
        for (index, command) in self.commands.iter().enumerate() {
            if command.name().is_empty() {
                return Err(ConfigError::EmptyCommandName {
                    index,
                    usage_line: command.usage_line().to_owned(),
                });
            }
            if !seen.insert(command.name()) {
                warn!(
                    program = %self.name,
                    command = %command.name(),
                    "Duplicate command name, only the first will be used"
                );
            }
        }

        Ok(Program::new(
            self.name,
            self.short,
            self.commands,
            self.global_flags,
        ))
    }
}
