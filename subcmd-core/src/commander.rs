//! # Commander
//!
//! Central registry for commands with verb resolution, flag binding and
//! help generation.

use std::any::Any;
use std::cell::{Ref, RefCell};
use std::io::{self, Write};
use std::rc::Rc;

use tracing::{debug, error, warn};

use crate::builtins::{CommandsCommand, FlagsCommand, HelpCommand};
use crate::command::{Command, ExitStatus};
use crate::context::CommandContext;
use crate::error::Result;
use crate::explain::{self, ExplainCommandFn, ExplainFn, ExplainGroupFn};
use crate::flags::{Flag, FlagSet};
use crate::group::CommandGroup;
use crate::output::Sink;

/// Registry state, shared with the usage callback of the top-level flag set
struct Registry {
    groups: Vec<CommandGroup>,
    important: Vec<String>,
    explain: ExplainFn,
    explain_group: ExplainGroupFn,
    explain_command: ExplainCommandFn,
    output: Sink,
    error: Sink,
}

/// A set of commands, grouped by topic, dispatched by verb.
///
/// ```rust
/// use std::any::Any;
/// use subcmd_core::{Command, CommandContext, Commander, ExitStatus, FlagSet, Sink};
///
/// struct Hello;
///
/// impl Command for Hello {
///     fn name(&self) -> &str { "hello" }
///     fn synopsis(&self) -> &str { "print a greeting" }
///     fn usage(&self) -> &str { "hello:\n\tPrint a greeting.\n" }
///     fn execute(&self, ctx: &CommandContext<'_>, _f: &FlagSet, _a: &[&dyn Any]) -> ExitStatus {
///         let mut out = ctx.commander().unwrap().output();
///         let _ = std::io::Write::write_all(&mut out, b"hello\n");
///         ExitStatus::Success
///     }
/// }
///
/// let mut commander = Commander::new("tool", Some(FlagSet::new("tool")));
/// commander.set_output(Sink::buffer());
/// commander.register(Hello, "");
/// commander.parse(["hello"]).unwrap();
///
/// assert_eq!(commander.execute(&CommandContext::new(), &[]), ExitStatus::Success);
/// assert_eq!(commander.output().contents(), "hello\n");
/// ```
pub struct Commander {
    name: String,
    top_flags: Option<FlagSet>,
    // Positional arguments when there is no top-level flag set
    positional: Vec<String>,
    registry: Rc<RefCell<Registry>>,
}

impl Commander {
    /// Create a commander named `name` (normally the basename of `argv[0]`)
    /// with an optional set of top-level flags.
    ///
    /// The top-level set's usage callback is replaced with one writing the
    /// full usage to the commander's error sink. It follows later calls to
    /// [`Commander::set_explain`] and [`Commander::set_error`].
    pub fn new(name: impl Into<String>, mut top_flags: Option<FlagSet>) -> Self {
        let name = name.into();
        let registry = Rc::new(RefCell::new(Registry {
            groups: Vec::new(),
            important: Vec::new(),
            explain: Rc::new(explain::explain),
            explain_group: Rc::new(explain::explain_group),
            explain_command: Rc::new(explain::explain_command),
            output: Sink::Stdout,
            error: Sink::Stderr,
        }));

        if let Some(flags) = top_flags.as_mut() {
            let name = name.clone();
            let registry = Rc::clone(&registry);
            flags.set_usage(move |top| {
                // A throwaway view over the same registry, seeing `top` as
                // its top level
                let view = Commander {
                    name: name.clone(),
                    top_flags: Some(top.clone()),
                    positional: Vec::new(),
                    registry: Rc::clone(&registry),
                };
                view.report_usage();
            });
        }

        Self {
            name,
            top_flags,
            positional: Vec::new(),
            registry,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Groups in registration order
    pub fn groups(&self) -> Ref<'_, [CommandGroup]> {
        Ref::map(self.registry.borrow(), |registry| registry.groups.as_slice())
    }

    pub fn top_flags(&self) -> Option<&FlagSet> {
        self.top_flags.as_ref()
    }

    pub fn top_flags_mut(&mut self) -> Option<&mut FlagSet> {
        self.top_flags.as_mut()
    }

    /// Where normal output goes (default: stdout)
    pub fn output(&self) -> Sink {
        self.registry.borrow().output.clone()
    }

    pub fn set_output(&mut self, output: Sink) {
        self.registry.borrow_mut().output = output;
    }

    /// Where usage and diagnostics go (default: stderr)
    pub fn error(&self) -> Sink {
        self.registry.borrow().error.clone()
    }

    pub fn set_error(&mut self, error: Sink) {
        self.registry.borrow_mut().error = error;
    }

    /// Replace the top-level usage renderer
    pub fn set_explain(
        &mut self,
        explain: impl Fn(&Commander, &mut dyn Write) -> io::Result<()> + 'static,
    ) {
        self.registry.borrow_mut().explain = Rc::new(explain);
    }

    /// Replace the command group renderer
    pub fn set_explain_group(
        &mut self,
        explain_group: impl Fn(&mut dyn Write, &CommandGroup) -> io::Result<()> + 'static,
    ) {
        self.registry.borrow_mut().explain_group = Rc::new(explain_group);
    }

    /// Replace the single command renderer
    pub fn set_explain_command(
        &mut self,
        explain_command: impl Fn(&mut dyn Write, &dyn Command) -> io::Result<()> + 'static,
    ) {
        self.registry.borrow_mut().explain_command = Rc::new(explain_command);
    }

    /// Add a command to `group`. Help output is sorted and arranged by group
    /// name; the empty group is explained first.
    ///
    /// Names are not checked for uniqueness: when two commands share a name
    /// the one registered first wins.
    pub fn register<C: Command + 'static>(&mut self, command: C, group: &str) -> &mut Self {
        self.register_shared(Rc::new(command), group)
    }

    /// Add an already shared command to `group`
    pub fn register_shared(&mut self, command: Rc<dyn Command>, group: &str) -> &mut Self {
        if let Some(existing) = self.find(command.name()) {
            if !Rc::ptr_eq(&existing, &command) {
                warn!(
                    command = command.name(),
                    group, "command name already registered; the first registration wins"
                );
            }
        }
        debug!(command = command.name(), group, "registering command");

        {
            let mut registry = self.registry.borrow_mut();
            let groups = &mut registry.groups;
            match groups.iter_mut().find(|g| g.name() == group) {
                Some(existing) => existing.push(command),
                None => {
                    let mut created = CommandGroup::new(group);
                    created.push(command);
                    groups.push(created);
                }
            }
        }
        self
    }

    /// Mark a top-level flag as important: it is printed by plain `help`.
    /// All flags, important or not, are printed by `flags`.
    pub fn important_flag(&mut self, name: impl Into<String>) -> &mut Self {
        self.registry.borrow_mut().important.push(name.into());
        self
    }

    pub fn important_flags(&self) -> Ref<'_, [String]> {
        Ref::map(self.registry.borrow(), |registry| registry.important.as_slice())
    }

    /// Groups sorted by name, empty name first
    pub(crate) fn sorted_groups(&self) -> Vec<CommandGroup> {
        let mut sorted = self.registry.borrow().groups.clone();
        sorted.sort_by(|a, b| a.name().cmp(b.name()));
        sorted
    }

    /// Visit each command group in lexicographical order
    pub fn visit_groups(&self, mut f: impl FnMut(&CommandGroup)) {
        for group in self.sorted_groups() {
            f(&group);
        }
    }

    /// Visit each command in registration order, grouped by command group in
    /// lexicographical order
    pub fn visit_commands(&self, mut f: impl FnMut(&CommandGroup, &dyn Command)) {
        self.visit_groups(|group| {
            for command in group.commands() {
                f(group, command.as_ref());
            }
        });
    }

    /// Visit the top-level flags in name order, including unset ones.
    /// Does nothing without a top-level flag set.
    pub fn visit_all(&self, f: impl FnMut(&Flag)) {
        if let Some(top_flags) = &self.top_flags {
            top_flags.visit_all(f);
        }
    }

    /// Visit the important top-level flags in name order.
    ///
    /// # Panics
    ///
    /// If an important flag is not defined on the top-level flag set. That is
    /// a registration bug, never a user error.
    pub fn visit_all_important(&self, mut f: impl FnMut(&Flag)) {
        let mut names = self.registry.borrow().important.clone();
        names.sort_unstable();

        for name in &names {
            match self.top_flags.as_ref().and_then(|t| t.lookup(name)) {
                Some(flag) => f(flag),
                None => {
                    error!(flag = %name, "important flag is not defined");
                    panic!("Important flag ({}) is not defined", name);
                }
            }
        }
    }

    /// Number of top-level flags defined, set or not
    pub fn count_top_flags(&self) -> usize {
        self.top_flags.as_ref().map_or(0, FlagSet::len)
    }

    /// First command named `name`, scanning groups and commands in
    /// registration order
    pub fn find(&self, name: &str) -> Option<Rc<dyn Command>> {
        self.registry
            .borrow()
            .groups
            .iter()
            .find_map(|group| group.find(name))
            .cloned()
    }

    /// Parse the top-level arguments (without the program name).
    ///
    /// On a flag error the flag set writes the message and runs its usage
    /// callback. Without a top-level flag set every argument is kept as a
    /// positional.
    pub fn parse<I, S>(&mut self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self.top_flags.as_mut() {
            Some(top_flags) => top_flags.parse(args),
            None => {
                self.positional = args.into_iter().map(Into::into).collect();
                Ok(())
            }
        }
    }

    /// Positional arguments left by the top level; the first one is the verb
    pub fn args(&self) -> &[String] {
        match &self.top_flags {
            Some(top_flags) => top_flags.args(),
            None => &self.positional,
        }
    }

    /// Find the subcommand named by the first positional argument, bind its
    /// flags and run it.
    ///
    /// Must be called once the top level has been parsed. On a usage error
    /// the relevant usage is written to the error sink and
    /// [`ExitStatus::UsageError`] is returned. `args` are passed as-is to the
    /// selected command.
    pub fn execute(&self, ctx: &CommandContext<'_>, args: &[&dyn Any]) -> ExitStatus {
        let Some((verb, rest)) = self.args().split_first() else {
            debug!(commander = %self.name, "no subcommand given");
            self.top_level_usage();
            return ExitStatus::UsageError;
        };

        let Some(command) = self.find(verb) else {
            debug!(commander = %self.name, verb = %verb, "subcommand not found");
            self.top_level_usage();
            return ExitStatus::UsageError;
        };

        let mut flags = FlagSet::new(verb.as_str());
        flags.set_output(self.error());
        let registry = Rc::clone(&self.registry);
        let target = Rc::clone(&command);
        flags.set_usage(move |_| {
            let (explain_command, mut sink) = {
                let registry = registry.borrow();
                (Rc::clone(&registry.explain_command), registry.error.clone())
            };
            if let Err(err) = explain_command(&mut sink, target.as_ref()) {
                warn!(error = %err, "failed to write command usage");
            }
        });
        command.set_flags(&mut flags);

        if flags.parse(rest.iter().cloned()).is_err() {
            return ExitStatus::UsageError;
        }

        debug!(verb = %verb, args = flags.narg(), "dispatching subcommand");
        let status = command.execute(&ctx.dispatched_by(self), &flags, args);
        debug!(verb = %verb, status = %status, "subcommand finished");
        status
    }

    /// Render the top-level usage with the current renderer
    pub fn explain(&self, w: &mut dyn Write) -> io::Result<()> {
        let explain = Rc::clone(&self.registry.borrow().explain);
        explain(self, w)
    }

    /// Render one group with the current renderer
    pub fn explain_group(&self, w: &mut dyn Write, group: &CommandGroup) -> io::Result<()> {
        let explain_group = Rc::clone(&self.registry.borrow().explain_group);
        explain_group(w, group)
    }

    /// Render one command with the current renderer
    pub fn explain_command(&self, w: &mut dyn Write, command: &dyn Command) -> io::Result<()> {
        let explain_command = Rc::clone(&self.registry.borrow().explain_command);
        explain_command(w, command)
    }

    /// Write the top-level usage to the error sink
    pub fn report_usage(&self) {
        if let Err(err) = self.explain(&mut self.error()) {
            warn!(error = %err, "failed to write usage");
        }
    }

    /// Run the top-level flag set's usage callback, or report the usage
    /// directly when there is no top-level set
    fn top_level_usage(&self) {
        match &self.top_flags {
            Some(top_flags) => top_flags.usage(),
            None => self.report_usage(),
        }
    }

    /// A command implementing `help` for the commander that dispatches it
    pub fn help_command() -> HelpCommand {
        HelpCommand
    }

    /// A command implementing `flags` for the commander that dispatches it
    pub fn flags_command() -> FlagsCommand {
        FlagsCommand
    }

    /// A command implementing `commands` for the commander that dispatches it
    pub fn commands_command() -> CommandsCommand {
        CommandsCommand
    }
}

impl std::fmt::Debug for Commander {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.registry.borrow();
        f.debug_struct("Commander")
            .field("name", &self.name)
            .field("groups", &registry.groups)
            .field("top_flags", &self.top_flags)
            .field("important", &registry.important)
            .finish()
    }
}
