//! # Demo Commands
//!
//! Commands registered by the `subcmd` binary next to the built-ins.

mod print;
mod sum;
mod wait;

pub use print::PrintCommand;
pub use sum::SumCommand;
pub use wait::WaitCommand;

use std::io;

use subcmd_core::{alias, CommandContext, Commander, ExitStatus, Sink};
use tracing::error;

/// Register the built-ins and every demo command
pub fn register(commander: &mut Commander) {
    commander
        .register(Commander::help_command(), "")
        .register(Commander::flags_command(), "")
        .register(Commander::commands_command(), "")
        .register(PrintCommand, "text")
        .register(alias("echo", PrintCommand), "text")
        .register(SumCommand, "math")
        .register(WaitCommand, "misc");
}

/// Normal output of the dispatching commander, stdout when run standalone
fn output(ctx: &CommandContext<'_>) -> Sink {
    ctx.commander()
        .map(|commander| commander.output())
        .unwrap_or(Sink::Stdout)
}

/// Diagnostic output of the dispatching commander, stderr when run standalone
fn error_output(ctx: &CommandContext<'_>) -> Sink {
    ctx.commander()
        .map(|commander| commander.error())
        .unwrap_or(Sink::Stderr)
}

/// Map the result of writing a command's output to its exit status
fn written(result: io::Result<()>, what: &str) -> ExitStatus {
    match result {
        Ok(()) => ExitStatus::Success,
        Err(err) => {
            error!(error = %err, what, "failed to write output");
            ExitStatus::Failure
        }
    }
}
