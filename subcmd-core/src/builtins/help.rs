use std::any::Any;

use crate::command::{Command, ExitStatus};
use crate::context::CommandContext;
use crate::flags::FlagSet;

use super::{dispatcher, log_write, not_understood};

/// `help [<subcommand>]`: the top-level usage, or the usage of one command
#[derive(Debug, Clone, Copy, Default)]
pub struct HelpCommand;

impl Command for HelpCommand {
    fn name(&self) -> &str {
        "help"
    }

    fn synopsis(&self) -> &str {
        "describe subcommands and their syntax"
    }

    fn usage(&self) -> &str {
        "help [<subcommand>]:\n\
         \tWith an argument, prints detailed information on the use of\n\
         \tthe specified subcommand. With no argument, print a list of\n\
         \tall commands and a brief description of each.\n"
    }

    fn execute(&self, ctx: &CommandContext<'_>, flags: &FlagSet, _args: &[&dyn Any]) -> ExitStatus {
        let commander = match dispatcher(ctx, self.name()) {
            Ok(commander) => commander,
            Err(status) => return status,
        };

        match flags.args() {
            [] => {
                log_write(commander.explain(&mut commander.output()), "usage");
                ExitStatus::Success
            }
            [name] => match commander.find(name) {
                Some(command) => {
                    log_write(
                        commander.explain_command(&mut commander.output(), command.as_ref()),
                        "command usage",
                    );
                    ExitStatus::Success
                }
                None => not_understood(commander, name),
            },
            _ => {
                flags.usage();
                ExitStatus::UsageError
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commander::Commander;
    use crate::output::Sink;

    fn commander(args: &[&str]) -> Commander {
        let mut commander = Commander::new("tool", Some(FlagSet::new("tool")));
        commander.set_output(Sink::buffer());
        commander.set_error(Sink::buffer());
        commander.register(HelpCommand, "");
        commander.parse(args.iter().copied()).unwrap();
        commander
    }

    #[test]
    fn test_help_without_args_explains_everything() {
        let commander = commander(&["help"]);
        assert_eq!(commander.execute(&CommandContext::new(), &[]), ExitStatus::Success);

        let out = commander.output().contents();
        assert!(out.starts_with("Usage: tool <flags> <subcommand> <subcommand args>\n\n"));
        assert!(out.contains("describe subcommands and their syntax"));
        assert!(!out.contains("Top-level flags"));
    }

    #[test]
    fn test_help_for_one_command() {
        let commander = commander(&["help", "help"]);
        assert_eq!(commander.execute(&CommandContext::new(), &[]), ExitStatus::Success);
        assert_eq!(commander.output().contents(), HelpCommand.usage());
    }

    #[test]
    fn test_help_for_unknown_command() {
        let commander = commander(&["help", "frobnicate"]);
        assert_eq!(commander.execute(&CommandContext::new(), &[]), ExitStatus::Failure);
        assert_eq!(commander.error().contents(), "Subcommand frobnicate not understood\n");
        assert_eq!(commander.output().contents(), "");
    }

    #[test]
    fn test_help_with_too_many_args() {
        let commander = commander(&["help", "a", "b"]);
        assert_eq!(commander.execute(&CommandContext::new(), &[]), ExitStatus::UsageError);
        assert!(commander.error().contents().starts_with("help [<subcommand>]:\n"));
    }

    #[test]
    fn test_help_without_commander_fails() {
        let mut flags = FlagSet::new("help");
        flags.parse(Vec::<String>::new()).unwrap();
        assert_eq!(
            HelpCommand.execute(&CommandContext::new(), &flags, &[]),
            ExitStatus::Failure
        );
    }
}
