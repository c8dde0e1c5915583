use std::io::{self, Write};

use subcmd_core::{ActionError, Command, FlagError, FlagSet, Printer};
use tracing::{debug, trace};

use crate::{Builder, Outcome};

const HELP_COMMAND: &str = "help";

/// A command line program whose interface is a set of subcommands, each with its own private
/// flags.
pub struct Program {
    name: String,
    short: String,
    commands: Vec<Command>,
    global_flags: FlagSet,
}

impl Program {
    /// Starts building a program. `name` is used in all usage text, so it should match the name
    /// of the executable.
    pub fn builder(name: impl Into<String>) -> Builder {
        Builder::new(name)
    }

    pub(crate) fn new(
        name: String,
        short: String,
        commands: Vec<Command>,
        global_flags: FlagSet,
    ) -> Self {
        Self {
            name,
            short,
            commands,
            global_flags,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short(&self) -> &str {
        &self.short
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn global_flags(&self) -> &FlagSet {
        &self.global_flags
    }

    /// Runs the program against the command line arguments, excluding the executable name,
    /// reporting everything it would print along with the exit status.
    pub fn run<I, T>(&mut self, args: I) -> Outcome
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        trace!(program = %self.name, ?args, "Running program");

        let mut global_flags = self.global_flags.clone();
        let args = match global_flags.parse(args) {
            Ok(args) => args,
            Err(e) => return Outcome::usage_error(flag_error_text(&e, self.usage_text())),
        };

        let Some((cmd0, rest)) = args.split_first() else {
            debug!(program = %self.name, "No command given");
            return Outcome::usage_error(self.usage_text());
        };

        if cmd0 == HELP_COMMAND {
            return self.help(rest);
        }

        let name = &self.name;
        let Some(command) = self
            .commands
            .iter_mut()
            .find(|c| c.name() == cmd0 && c.runnable())
        else {
            debug!(program = %name, command = %cmd0, "Unknown command");
            return Outcome::usage_error(format!(
                "{name}: unknown command {cmd0:?}\nRun '{name} help' for usage.\n"
            ));
        };

        debug!(program = %name, command = %cmd0, "Dispatching command");
        if global_flags.has_flags() {
            command.set_global_flags(global_flags);
        }

        let positional = match command.flags_mut().parse(rest.iter().cloned()) {
            Ok(positional) => positional,
            Err(e) => {
                return Outcome::usage_error(flag_error_text(&e, command.usage_text()));
            }
        };
        trace!(command = %cmd0, ?positional, "Parsed command flags");

        match command.run(&positional) {
            Ok(()) => Outcome::success(),
            Err(ActionError::Usage) => Outcome::usage_error(command.usage_text()),
            Err(e) => {
                debug!(command = %cmd0, "Command failed: {e}");
                Outcome::failure(format!("{name}: {e}\n"))
            }
        }
    }

    /// Runs the program against the process arguments and exits.
    pub fn exec(mut self) -> ! {
        let args = std::env::args_os()
            .skip(1)
            .map(|arg| arg.to_string_lossy().into_owned());
        self.run(args).exit()
    }

    fn help(&self, args: &[String]) -> Outcome {
        match args {
            [] => Outcome::help(self.usage_text()),
            [topic] => match self.commands.iter().find(|c| c.name() == topic) {
                Some(command) => {
                    debug!(program = %self.name, %topic, "Showing help topic");
                    Outcome::help(command.usage_text())
                }
                None => Outcome::usage_error(format!(
                    "Unknown help topic {topic:?}. Run '{} help'.\n",
                    self.name
                )),
            },
            _ => Outcome::usage_error(format!(
                "usage: {} help command\nToo many arguments given.\n",
                self.name
            )),
        }
    }

    pub fn print_usage(&self, w: &mut impl Write) -> io::Result<()> {
        w.write_all(self.usage_text().as_bytes())
    }

    /// Renders the full help screen: every runnable command, followed by the help topics if
    /// there are any.
    pub fn usage_text(&self) -> String {
        let width = Printer::column_width(self.commands.iter().map(Command::name));
        let (runnable, topics): (Vec<&Command>, Vec<&Command>) =
            self.commands.iter().partition(|c| c.runnable());

        let command_list = list(&runnable, width);
        let name = &self.name;
        let mut usage = format!(
            "{short}

Usage:

\t{name} command [arguments]

The commands are:

{command_list}
Use \"{name} help [command]\" for more information about a command.

",
            short = self.short,
        );

        if !topics.is_empty() {
            let topic_list = list(&topics, width);
            usage.push_str(&format!(
                "Additional help topics:

{topic_list}
Use \"{name} help [topic]\" for more information about that topic.

"
            ));
        }

        usage
    }
}

fn list(commands: &[&Command], width: usize) -> String {
    commands
        .iter()
        .fold(Printer::with_label_width(width), |printer, command| {
            printer.with_line(command.name(), command.short())
        })
        .print()
}

fn flag_error_text(err: &FlagError, usage: String) -> String {
    match err {
        FlagError::HelpRequested => usage,
        err => format!("{err}\n{usage}"),
    }
}

#[cfg(test)]
#[path = "./program_test.rs"]
mod program_test;
