use std::io::{self, Write};

use subcmd::cli::{ActionError, Command, ConfigError, Flag, Program};
use tracing::debug;

pub const NAME: &str = "greeter";

pub fn program() -> Result<Program, ConfigError> {
    Program::builder(NAME)
        .with_short("Example Program")
        .with_global_flag(Flag::bool("shout", false, "print greetings in upper case"))
        .with_command(hello())
        .with_command(greeting())
        .build()
}

fn hello() -> Command {
    Command::new("hello [-bye] [-times n] name")
        .with_short("print a greeting to stdout")
        .with_long(
            "
Prints a friendly greeting to the user!

The -bye flag can be used to say goodbye instead of hello.",
        )
        .with_flag(Flag::bool("bye", false, "say goodbye"))
        .with_flag(Flag::uint("times", 1, "print the greeting `n` times"))
        .with_action(run_hello)
}

fn greeting() -> Command {
    Command::new("greeting")
        .with_short("help about greetings")
        .with_long(
            "
A greeting is printed as '<word>, <name>!'.

Run with -shout before the command name to print it in upper case.",
        )
}

fn run_hello(cmd: &Command, args: &[String]) -> Result<(), ActionError> {
    // The caller must provide a name to greet.
    let [name] = args else {
        return Err(cmd.usage());
    };
    if name.is_empty() {
        return Err(cmd.usage());
    }

    let flags = cmd.flags();
    let greeting = if flags.get_bool("bye").unwrap_or_default() {
        "Goodbye"
    } else {
        "Hello"
    };
    let shout = cmd
        .global_flags()
        .and_then(|flags| flags.get_bool("shout"))
        .unwrap_or_default();
    let times = flags.get_uint("times").unwrap_or(1);
    debug!(%name, shout, times, "Greeting");

    let mut line = format!("{greeting}, {name}!");
    if shout {
        line = line.to_uppercase();
    }
    let mut stdout = io::stdout().lock();
    for _ in 0..times {
        writeln!(stdout, "{line}")?;
    }
    Ok(())
}
