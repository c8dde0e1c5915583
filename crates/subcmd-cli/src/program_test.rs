use std::sync::{Arc, Mutex};

use subcmd_core::{ActionError, Command, Flag};

use crate::{ConfigError, ExitStatus, Program};

type Calls = Arc<Mutex<Vec<(bool, Vec<String>)>>>;

fn hello(calls: Calls) -> Command {
    Command::new("hello [-bye] name")
        .with_short("greet")
        .with_long("Prints a greeting.")
        .with_flag(Flag::bool("bye", false, "say goodbye"))
        .with_action(move |cmd, args| {
            if args.len() != 1 {
                return Err(cmd.usage());
            }
            let bye = cmd.flags().get_bool("bye").unwrap_or_default();
            calls.lock().unwrap().push((bye, args.to_vec()));
            Ok(())
        })
}

fn topic() -> Command {
    Command::new("help-topic")
        .with_short("info")
        .with_long("\nThis is the help text.\n")
}

fn greeter(calls: Calls) -> Program {
    Program::builder("greeter")
        .with_short("Example Program")
        .with_command(hello(calls))
        .with_command(topic())
        .build()
        .unwrap()
}

const FULL_USAGE: &str = "Example Program

Usage:

\tgreeter command [arguments]

The commands are:

\thello          greet

Use \"greeter help [command]\" for more information about a command.

Additional help topics:

\thelp-topic     info

Use \"greeter help [topic]\" for more information about that topic.

";

#[test]
fn test_dispatch_with_flag() {
    let calls = Calls::default();
    let mut program = greeter(calls.clone());
    let outcome = program.run(["hello", "-bye", "World"]);
    assert_eq!(ExitStatus::Success, outcome.status);
    assert!(outcome.stdout.is_empty());
    assert!(outcome.stderr.is_empty());
    assert_eq!(
        vec![(true, vec!["World".to_owned()])],
        *calls.lock().unwrap()
    );
}

#[test]
fn test_dispatch_without_flag() {
    let calls = Calls::default();
    let mut program = greeter(calls.clone());
    assert_eq!(0, program.run(["hello", "World"]).code());
    assert_eq!(
        vec![(false, vec!["World".to_owned()])],
        *calls.lock().unwrap()
    );
}

#[test]
fn test_repeated_runs_reparse_flags() {
    let calls = Calls::default();
    let mut program = greeter(calls.clone());
    program.run(["hello", "-bye", "a"]);
    program.run(["hello", "b"]);
    assert_eq!(
        vec![(true, vec!["a".to_owned()]), (false, vec!["b".to_owned()])],
        *calls.lock().unwrap()
    );
}

#[test]
fn test_no_args() {
    let mut program = greeter(Calls::default());
    let outcome = program.run(Vec::<String>::new());
    assert_eq!(ExitStatus::Usage, outcome.status);
    assert_eq!(FULL_USAGE, outcome.stderr);
    assert!(outcome.stdout.is_empty());
}

#[test]
fn test_help() {
    let mut program = greeter(Calls::default());
    let outcome = program.run(["help"]);
    assert_eq!(ExitStatus::Success, outcome.status);
    assert_eq!(FULL_USAGE, outcome.stdout);
    assert!(outcome.stderr.is_empty());
}

#[test]
fn test_help_for_command() {
    let mut program = greeter(Calls::default());
    let outcome = program.run(["help", "hello"]);
    assert_eq!(ExitStatus::Success, outcome.status);
    assert_eq!(
        "usage: hello [-bye] name\n\n  -bye\n    \tsay goodbye\n\nPrints a greeting.\n",
        outcome.stdout
    );
}

#[test]
fn test_help_for_topic() {
    let mut program = greeter(Calls::default());
    let outcome = program.run(["help", "help-topic"]);
    assert_eq!(ExitStatus::Success, outcome.status);
    assert_eq!("This is the help text.\n", outcome.stdout);
}

#[test]
fn test_unknown_help_topic() {
    let mut program = greeter(Calls::default());
    let outcome = program.run(["help", "nosuchtopic"]);
    assert_eq!(ExitStatus::Usage, outcome.status);
    assert_eq!(
        "Unknown help topic \"nosuchtopic\". Run 'greeter help'.\n",
        outcome.stderr
    );
}

#[test]
fn test_help_too_many_args() {
    let mut program = greeter(Calls::default());
    let outcome = program.run(["help", "a", "b"]);
    assert_eq!(ExitStatus::Usage, outcome.status);
    assert_eq!(
        "usage: greeter help command\nToo many arguments given.\n",
        outcome.stderr
    );
}

#[test]
fn test_unknown_command() {
    let mut program = greeter(Calls::default());
    let outcome = program.run(["bogus"]);
    assert_eq!(ExitStatus::Usage, outcome.status);
    assert_eq!(
        "greeter: unknown command \"bogus\"\nRun 'greeter help' for usage.\n",
        outcome.stderr
    );
}

#[test]
fn test_topic_is_not_runnable() {
    let mut program = greeter(Calls::default());
    let outcome = program.run(["help-topic"]);
    assert_eq!(ExitStatus::Usage, outcome.status);
    assert!(
        outcome
            .stderr
            .starts_with("greeter: unknown command \"help-topic\"")
    );
}

#[test]
fn test_action_usage_error() {
    let calls = Calls::default();
    let mut program = greeter(calls.clone());
    let outcome = program.run(["hello"]);
    assert_eq!(ExitStatus::Usage, outcome.status);
    assert!(outcome.stderr.starts_with("usage: hello [-bye] name\n"));
    assert!(calls.lock().unwrap().is_empty());
}

#[test]
fn test_command_flag_error_shows_command_usage() {
    let mut program = greeter(Calls::default());
    let outcome = program.run(["hello", "-nope", "World"]);
    assert_eq!(ExitStatus::Usage, outcome.status);
    assert!(
        outcome
            .stderr
            .starts_with("flag provided but not defined: -nope\nusage: hello [-bye] name\n")
    );
}

#[test]
fn test_command_help_flag_shows_only_usage() {
    let mut program = greeter(Calls::default());
    let outcome = program.run(["hello", "-h"]);
    assert_eq!(ExitStatus::Usage, outcome.status);
    assert!(outcome.stderr.starts_with("usage: hello [-bye] name\n"));
}

#[test]
fn test_global_flag_error_shows_program_usage() {
    let mut program = greeter(Calls::default());
    let outcome = program.run(["-x", "hello"]);
    assert_eq!(ExitStatus::Usage, outcome.status);
    assert_eq!(
        format!("flag provided but not defined: -x\n{FULL_USAGE}"),
        outcome.stderr
    );
}

#[test]
fn test_global_flags_reach_command() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorded = seen.clone();
    let mut program = Program::builder("prog")
        .with_global_flag(Flag::bool("v", false, "verbose"))
        .with_command(Command::new("show").with_action(move |cmd, _| {
            let verbose = cmd
                .global_flags()
                .and_then(|flags| flags.get_bool("v"))
                .unwrap_or_default();
            recorded.lock().unwrap().push(verbose);
            Ok(())
        }))
        .build()
        .unwrap();

    assert_eq!(0, program.run(["-v", "show"]).code());
    assert_eq!(0, program.run(["show"]).code());
    assert_eq!(vec![true, false], *seen.lock().unwrap());
    assert!(!program.global_flags().is_set("v"));
}

#[test]
fn test_action_failure() {
    let mut program = Program::builder("prog")
        .with_command(
            Command::new("fail").with_action(|_, _| Err(ActionError::failed("disk on fire"))),
        )
        .build()
        .unwrap();
    let outcome = program.run(["fail"]);
    assert_eq!(ExitStatus::Failure, outcome.status);
    assert_eq!("prog: disk on fire\n", outcome.stderr);
}

#[test]
fn test_first_runnable_match_wins() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let (first, second) = (order.clone(), order.clone());
    let mut program = Program::builder("prog")
        .with_command(Command::new("dup").with_short("topic"))
        .with_command(Command::new("dup").with_action(move |_, _| {
            first.lock().unwrap().push(1);
            Ok(())
        }))
        .with_command(Command::new("dup").with_action(move |_, _| {
            second.lock().unwrap().push(2);
            Ok(())
        }))
        .build()
        .unwrap();
    assert_eq!(0, program.run(["dup"]).code());
    assert_eq!(vec![1], *order.lock().unwrap());
    // help resolves topics and commands alike, so the topic comes first
    assert_eq!("\n", program.run(["help", "dup"]).stdout);
}

#[test]
fn test_column_width_without_topics() {
    let program = Program::builder("prog")
        .with_short("Short")
        .with_command(
            Command::new("a-very-long-command-name args")
                .with_short("long one")
                .with_action(|_, _| Ok(())),
        )
        .with_command(Command::new("x").with_short("short one").with_action(|_, _| Ok(())))
        .build()
        .unwrap();
    let usage = program.usage_text();
    assert!(usage.contains("\ta-very-long-command-name  long one\n"));
    assert!(usage.contains(&format!("\tx{}short one\n", " ".repeat(25))));
    assert!(!usage.contains("Additional help topics"));
    assert!(usage.ends_with("for more information about a command.\n\n"));
}

#[test]
fn test_print_usage() {
    let program = greeter(Calls::default());
    let mut out = Vec::new();
    program.print_usage(&mut out).unwrap();
    assert_eq!(FULL_USAGE, String::from_utf8(out).unwrap());
}

#[test]
fn test_empty_command_name_rejected() {
    let err = Program::builder("prog")
        .with_command(Command::new("ok").with_action(|_, _| Ok(())))
        .with_command(Command::new(" oops"))
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, ConfigError::EmptyCommandName { index: 1, .. }));
}

#[test]
fn test_empty_program_name_rejected() {
    assert!(matches!(
        Program::builder("").build().err().unwrap(),
        ConfigError::EmptyProgramName
    ));
}
