//! # Command Trait
//!
//! Unified interface for every unit that can be registered with a
//! [`Commander`](crate::Commander).

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::alias::Alias;
use crate::context::CommandContext;
use crate::flags::FlagSet;

/// Result of running a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitStatus {
    /// The command ran and succeeded
    Success,
    /// The command ran but failed
    Failure,
    /// The command was misused (missing verb, bad flags, wrong arguments)
    UsageError,
}

impl ExitStatus {
    /// Conventional process exit code for this status
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::Failure => 1,
            ExitStatus::UsageError => 2,
        }
    }

    pub fn is_success(self) -> bool {
        self == ExitStatus::Success
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitStatus::Success => write!(f, "success"),
            ExitStatus::Failure => write!(f, "failure"),
            ExitStatus::UsageError => write!(f, "usage error"),
        }
    }
}

/// Command trait - must be implemented by all commands
pub trait Command {
    /// Command name, matched against the verb
    fn name(&self) -> &str;

    /// One-line description for help listings
    fn synopsis(&self) -> &str;

    /// Long usage text shown by `help <command>`
    fn usage(&self) -> &str;

    /// Declare this command's flags on `flags`
    fn set_flags(&self, _flags: &mut FlagSet) {}

    /// Execute the command.
    ///
    /// `flags` has been parsed against the arguments following the verb; its
    /// positional arguments are the command's arguments. `args` are the extra
    /// values the caller handed to [`Commander::execute`](crate::Commander::execute).
    fn execute(&self, ctx: &CommandContext<'_>, flags: &FlagSet, args: &[&dyn Any]) -> ExitStatus;

    /// The alias wrapper, if this command is one
    fn as_alias(&self) -> Option<&Alias> {
        None
    }
}

impl<C: Command + ?Sized> Command for Rc<C> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn synopsis(&self) -> &str {
        (**self).synopsis()
    }

    fn usage(&self) -> &str {
        (**self).usage()
    }

    fn set_flags(&self, flags: &mut FlagSet) {
        (**self).set_flags(flags)
    }

    fn execute(&self, ctx: &CommandContext<'_>, flags: &FlagSet, args: &[&dyn Any]) -> ExitStatus {
        (**self).execute(ctx, flags, args)
    }

    fn as_alias(&self) -> Option<&Alias> {
        (**self).as_alias()
    }
}

impl<C: Command + ?Sized> Command for Box<C> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn synopsis(&self) -> &str {
        (**self).synopsis()
    }

    fn usage(&self) -> &str {
        (**self).usage()
    }

    fn set_flags(&self, flags: &mut FlagSet) {
        (**self).set_flags(flags)
    }

    fn execute(&self, ctx: &CommandContext<'_>, flags: &FlagSet, args: &[&dyn Any]) -> ExitStatus {
        (**self).execute(ctx, flags, args)
    }

    fn as_alias(&self) -> Option<&Alias> {
        (**self).as_alias()
    }
}
