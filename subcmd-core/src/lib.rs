//! # subcmd-core
//!
//! A command dispatcher for tools built around verbs: `tool <flags>
//! <subcommand> <subcommand args>`.
//!
//! ## Architecture
//!
//! - **Command**: the trait every registered unit implements
//! - **Alias**: a command known by another name
//! - **Commander**: registry, verb resolution and dispatch
//! - **FlagSet**: typed flags bound from arguments (parsed with `clap`)
//! - **Explain**: replaceable help renderers
//! - **Builtins**: `help`, `flags` and `commands`
//!
//! ## Example
//!
//! ```text
//! let mut commander = Commander::new("tool", Some(top_flags));
//! commander.register(Commander::help_command(), "");
//! commander.register(MyCommand, "storage");
//! commander.parse(std::env::args().skip(1))?;
//! let status = commander.execute(&CommandContext::new(), &[]);
//! ```

pub mod alias;
pub mod builtins;
pub mod command;
pub mod commander;
pub mod context;
pub mod error;
pub mod explain;
pub mod flags;
pub mod group;
pub mod output;

pub use alias::{alias, dealias, Alias};
pub use builtins::{CommandsCommand, FlagsCommand, HelpCommand};
pub use command::{Command, ExitStatus};
pub use commander::Commander;
pub use context::CommandContext;
pub use error::{FlagError, Result};
pub use explain::{explain, explain_command, explain_group, ExplainCommandFn, ExplainFn, ExplainGroupFn};
pub use flags::{Flag, FlagSet, FlagValue, UsageFn};
pub use group::CommandGroup;
pub use output::Sink;
