use std::any::Any;
use std::io::Write;

use crate::command::{Command, ExitStatus};
use crate::context::CommandContext;
use crate::flags::FlagSet;

use super::{dispatcher, log_write};

/// `commands`: every registered name, one per line, in registration order
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandsCommand;

impl Command for CommandsCommand {
    fn name(&self) -> &str {
        "commands"
    }

    fn synopsis(&self) -> &str {
        "list all command names"
    }

    fn usage(&self) -> &str {
        "commands:\n\tPrint a list of all commands.\n"
    }

    fn execute(&self, ctx: &CommandContext<'_>, flags: &FlagSet, _args: &[&dyn Any]) -> ExitStatus {
        let commander = match dispatcher(ctx, self.name()) {
            Ok(commander) => commander,
            Err(status) => return status,
        };
        if flags.narg() != 0 {
            flags.usage();
            return ExitStatus::UsageError;
        }

        let mut out = commander.output();
        let result = commander.groups().iter().try_for_each(|group| {
            group
                .commands()
                .iter()
                .try_for_each(|command| writeln!(out, "{}", command.name()))
        });
        log_write(result, "command names");
        ExitStatus::Success
    }
}
