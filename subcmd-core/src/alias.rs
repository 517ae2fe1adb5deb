//! # Command Aliases
//!
//! A wrapper that registers an existing command under another name.

use std::any::Any;

use crate::command::{Command, ExitStatus};
use crate::context::CommandContext;
use crate::flags::FlagSet;

/// A command reporting a different name and delegating everything else to
/// the command it wraps.
///
/// Aliases can wrap aliases; [`dealias`] follows the chain back to the
/// underlying command.
pub struct Alias {
    alias: String,
    inner: Box<dyn Command>,
}

impl Alias {
    /// The directly wrapped command, which may itself be an alias
    pub fn inner(&self) -> &dyn Command {
        self.inner.as_ref()
    }
}

/// Wrap `command` so it is known as `name`
pub fn alias(name: impl Into<String>, command: impl Command + 'static) -> Alias {
    Alias {
        alias: name.into(),
        inner: Box::new(command),
    }
}

/// Follow a chain of aliases down to the first command that is not one.
///
/// Returns `command` itself when it is not an alias.
pub fn dealias(command: &dyn Command) -> &dyn Command {
    let mut current = command;
    while let Some(alias) = current.as_alias() {
        current = alias.inner();
    }
    current
}

impl Command for Alias {
    fn name(&self) -> &str {
        &self.alias
    }

    fn synopsis(&self) -> &str {
        self.inner.synopsis()
    }

    fn usage(&self) -> &str {
        self.inner.usage()
    }

    fn set_flags(&self, flags: &mut FlagSet) {
        self.inner.set_flags(flags)
    }

    fn execute(&self, ctx: &CommandContext<'_>, flags: &FlagSet, args: &[&dyn Any]) -> ExitStatus {
        self.inner.execute(ctx, flags, args)
    }

    fn as_alias(&self) -> Option<&Alias> {
        Some(self)
    }
}
