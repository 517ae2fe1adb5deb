use std::any::Any;
use std::io::Write;

use crate::command::{Command, ExitStatus};
use crate::context::CommandContext;
use crate::flags::FlagSet;

use super::{dispatcher, log_write, not_understood};

/// `flags [<subcommand>]`: every top-level flag, or the flags of one command
#[derive(Debug, Clone, Copy, Default)]
pub struct FlagsCommand;

impl Command for FlagsCommand {
    fn name(&self) -> &str {
        "flags"
    }

    fn synopsis(&self) -> &str {
        "describe all known top-level flags"
    }

    fn usage(&self) -> &str {
        "flags [<subcommand>]:\n\
         \tWith an argument, print all flags of <subcommand>. Else,\n\
         \tprint a description of all known top-level flags.  (The basic\n\
         \thelp information only discusses the most generally important\n\
         \ttop-level flags.)\n"
    }

    fn execute(&self, ctx: &CommandContext<'_>, flags: &FlagSet, _args: &[&dyn Any]) -> ExitStatus {
        let commander = match dispatcher(ctx, self.name()) {
            Ok(commander) => commander,
            Err(status) => return status,
        };
        let mut out = commander.output();

        match flags.args() {
            [] => {
                let result = match commander.top_flags() {
                    Some(top_flags) => top_flags.write_defaults(&mut out),
                    None => writeln!(out, "No top-level flags are defined."),
                };
                log_write(result, "top-level flags");
                ExitStatus::Success
            }
            [name] => match commander.find(name) {
                Some(command) => {
                    let mut subflags = FlagSet::new(command.name());
                    command.set_flags(&mut subflags);
                    log_write(subflags.write_defaults(&mut out), "command flags");
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
