//! # Built-in Commands
//!
//! `help`, `flags` and `commands`. They act on whichever [`Commander`]
//! dispatches them, found through [`CommandContext::commander`].

mod commands;
mod flags;
mod help;

pub use commands::CommandsCommand;
pub use flags::FlagsCommand;
pub use help::HelpCommand;

use std::io::{self, Write};

use tracing::{error, warn};

use crate::command::ExitStatus;
use crate::commander::Commander;
use crate::context::CommandContext;

/// The dispatching commander, or a logged failure when run standalone
fn dispatcher<'a>(ctx: &CommandContext<'a>, command: &str) -> std::result::Result<&'a Commander, ExitStatus> {
    ctx.commander().ok_or_else(|| {
        error!(command, "built-in command executed without a commander");
        ExitStatus::Failure
    })
}

/// Log a failed write; help output going nowhere is not a command failure
fn log_write(result: io::Result<()>, what: &str) {
    if let Err(err) = result {
        warn!(error = %err, what, "failed to write output");
    }
}

/// Report a subcommand name nobody registered
fn not_understood(commander: &Commander, name: &str) -> ExitStatus {
    log_write(
        writeln!(commander.error(), "Subcommand {} not understood", name),
        "diagnostic",
    );
    ExitStatus::Failure
}
