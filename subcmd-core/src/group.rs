//! # Command Groups
//!
//! Commands sharing a topic label, used to organize help output.

use std::rc::Rc;

use crate::command::Command;

/// A set of commands about a common topic.
///
/// Commands are stored in registration order; help output sorts them by
/// name without touching the stored order.
#[derive(Clone)]
pub struct CommandGroup {
    name: String,
    commands: Vec<Rc<dyn Command>>,
}

impl CommandGroup {
    /// Create an empty group
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commands: Vec::new(),
        }
    }

    /// Group label; empty for ungrouped commands
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Commands in registration order
    pub fn commands(&self) -> &[Rc<dyn Command>] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub(crate) fn push(&mut self, command: Rc<dyn Command>) {
        self.commands.push(command);
    }

    /// Commands sorted by name, for display
    pub fn sorted(&self) -> Vec<&dyn Command> {
        let mut sorted: Vec<&dyn Command> = self.commands.iter().map(|c| &**c).collect();
        sorted.sort_by(|a, b| a.name().cmp(b.name()));
        sorted
    }

    /// First command registered under `name`
    pub fn find(&self, name: &str) -> Option<&Rc<dyn Command>> {
        self.commands.iter().find(|c| c.name() == name)
    }
}

impl std::fmt::Debug for CommandGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandGroup")
            .field("name", &self.name)
            .field(
                "commands",
                &self.commands.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ExitStatus;
    use crate::context::CommandContext;
    use crate::flags::FlagSet;
    use std::any::Any;

    struct Named(&'static str);

    impl Command for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn synopsis(&self) -> &str {
            ""
        }

        fn usage(&self) -> &str {
            ""
        }

        fn execute(&self, _ctx: &CommandContext<'_>, _flags: &FlagSet, _args: &[&dyn Any]) -> ExitStatus {
            ExitStatus::Success
        }
    }

    #[test]
    fn test_sorted_view_keeps_storage_order() {
        let mut group = CommandGroup::new("tools");
        for name in ["zip", "add", "merge"] {
            group.push(Rc::new(Named(name)));
        }

        let sorted: Vec<_> = group.sorted().into_iter().map(|c| c.name()).collect();
        assert_eq!(sorted, ["add", "merge", "zip"]);

        let stored: Vec<_> = group.commands().iter().map(|c| c.name()).collect();
        assert_eq!(stored, ["zip", "add", "merge"]);
        assert_eq!(group.len(), 3);
    }

    #[test]
    fn test_find_returns_first_match() {
        let mut group = CommandGroup::new("");
        let first: Rc<dyn Command> = Rc::new(Named("dup"));
        group.push(first.clone());
        group.push(Rc::new(Named("dup")));

        let found = group.find("dup").unwrap();
        assert!(Rc::ptr_eq(found, &first));
        assert!(group.find("missing").is_none());
    }
}
