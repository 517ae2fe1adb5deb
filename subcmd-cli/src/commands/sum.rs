use std::any::Any;
use std::io::Write;

use subcmd_core::{Command, CommandContext, ExitStatus, FlagSet};
use tracing::warn;

use super::{error_output, output, written};

/// `sum [-strict] <int>...`
#[derive(Debug, Clone, Copy, Default)]
pub struct SumCommand;

impl Command for SumCommand {
    fn name(&self) -> &str {
        "sum"
    }

    fn synopsis(&self) -> &str {
        "add integers"
    }

    fn usage(&self) -> &str {
        "sum [-strict] <int>...:\n\
         \tPrint the sum of the integer arguments. Arguments that are not\n\
         \tintegers are skipped unless -strict is given.\n"
    }

    fn set_flags(&self, flags: &mut FlagSet) {
        flags.bool_flag("strict", false, "fail on arguments that are not integers");
    }

    fn execute(&self, ctx: &CommandContext<'_>, flags: &FlagSet, _args: &[&dyn Any]) -> ExitStatus {
        let strict = flags.get_bool("strict").unwrap_or(false);
        let mut total: i64 = 0;

        for arg in flags.args() {
            let value = match arg.parse::<i64>() {
                Ok(value) => value,
                Err(_) if strict => {
                    written(
                        writeln!(error_output(ctx), "sum: {:?} is not an integer", arg),
                        "diagnostic",
                    );
                    return ExitStatus::Failure;
                }
                Err(_) => {
                    warn!(arg = %arg, "skipping non-integer argument");
                    continue;
                }
            };
            total = match total.checked_add(value) {
                Some(total) => total,
                None => {
                    written(writeln!(error_output(ctx), "sum: overflow"), "diagnostic");
                    return ExitStatus::Failure;
                }
            };
        }

        written(writeln!(output(ctx), "{}", total), "sum")
    }
}
