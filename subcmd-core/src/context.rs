//! # Command Context
//!
//! Execution context handed to every command.

use tokio_util::sync::CancellationToken;

use crate::commander::Commander;

/// Command execution context.
///
/// Carries the caller's cancellation token, forwarded unchanged to the
/// selected command, and the commander dispatching the command. The
/// commander never cancels the token itself.
#[derive(Clone, Default)]
pub struct CommandContext<'a> {
    token: CancellationToken,
    commander: Option<&'a Commander>,
}

impl<'a> CommandContext<'a> {
    /// Create a context with a fresh, never-cancelled token
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context around an existing cancellation token
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            commander: None,
        }
    }

    /// The same context, dispatched by `commander`
    pub(crate) fn dispatched_by<'b>(&self, commander: &'b Commander) -> CommandContext<'b> {
        CommandContext {
            token: self.token.clone(),
            commander: Some(commander),
        }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Check if the caller asked for cancellation
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// The commander that dispatched the running command, if any
    pub fn commander(&self) -> Option<&'a Commander> {
        self.commander
    }
}

impl std::fmt::Debug for CommandContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandContext")
            .field("cancelled", &self.is_cancelled())
            .field("commander", &self.commander.map(Commander::name))
            .finish()
    }
}
