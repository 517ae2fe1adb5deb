use std::any::Any;
use std::io::Write;

use subcmd_core::{Command, CommandContext, ExitStatus, FlagSet};

use super::{output, written};

/// Separator used when the top level defines none
const DEFAULT_SEPARATOR: &str = " ";

/// `print [-capitalize] <text>...`
#[derive(Debug, Clone, Copy, Default)]
pub struct PrintCommand;

impl Command for PrintCommand {
    fn name(&self) -> &str {
        "print"
    }

    fn synopsis(&self) -> &str {
        "print arguments to stdout"
    }

    fn usage(&self) -> &str {
        "print [-capitalize] <some text>:\n\
         \tPrint the arguments joined by the top-level separator.\n"
    }

    fn set_flags(&self, flags: &mut FlagSet) {
        flags.bool_flag("capitalize", false, "capitalize output");
    }

    fn execute(&self, ctx: &CommandContext<'_>, flags: &FlagSet, _args: &[&dyn Any]) -> ExitStatus {
        let separator = ctx
            .commander()
            .and_then(|commander| commander.top_flags())
            .and_then(|top| top.get_str("separator"))
            .unwrap_or(DEFAULT_SEPARATOR);

        let mut text = flags.args().join(separator);
        if flags.get_bool("capitalize").unwrap_or(false) {
            text = text.to_uppercase();
        }

        written(writeln!(output(ctx), "{}", text), "printed text")
    }
}
