//! # Help Rendering
//!
//! Default renderers for the top-level usage, a command group and a single
//! command. A [`Commander`] can be given replacements through
//! [`Commander::set_explain`], [`Commander::set_explain_group`] and
//! [`Commander::set_explain_command`].

use std::collections::HashMap;
use std::io::{self, Write};
use std::rc::Rc;

use crate::alias::dealias;
use crate::command::Command;
use crate::commander::Commander;
use crate::flags::FlagSet;
use crate::group::CommandGroup;

/// Renders the full top-level usage
pub type ExplainFn = Rc<dyn Fn(&Commander, &mut dyn Write) -> io::Result<()>>;

/// Renders one command group
pub type ExplainGroupFn = Rc<dyn Fn(&mut dyn Write, &CommandGroup) -> io::Result<()>>;

/// Renders the usage of one command
pub type ExplainCommandFn = Rc<dyn Fn(&mut dyn Write, &dyn Command) -> io::Result<()>>;

/// Print a brief description of all the subcommands and the important
/// top-level flags.
///
/// # Panics
///
/// If a flag marked important is not defined on the top-level flag set.
pub fn explain(commander: &Commander, w: &mut dyn Write) -> io::Result<()> {
    writeln!(
        w,
        "Usage: {} <flags> <subcommand> <subcommand args>\n",
        commander.name()
    )?;
    for group in commander.sorted_groups() {
        commander.explain_group(w, &group)?;
    }

    let Some(top_flags) = commander.top_flags() else {
        return writeln!(w, "\nNo top level flags.");
    };

    if commander.important_flags().is_empty() {
        if !top_flags.is_empty() {
            writeln!(
                w,
                "\nUse \"{} flags\" for a list of top-level flags",
                commander.name()
            )?;
        }
        return Ok(());
    }

    writeln!(
        w,
        "\nTop-level flags (use \"{} flags\" for a full list):",
        commander.name()
    )?;
    let mut lines = Vec::new();
    commander.visit_all_important(|flag| {
        lines.push(format!(
            "  -{}={}: {}",
            flag.name(),
            flag.def_value(),
            flag.usage()
        ));
    });
    for line in lines {
        writeln!(w, "{}", line)?;
    }
    Ok(())
}

/// Explain all the subcommands of one group, sorted by name, with each
/// command's aliases listed after its primary name.
pub fn explain_group(w: &mut dyn Write, group: &CommandGroup) -> io::Result<()> {
    if group.is_empty() {
        return Ok(());
    }
    if group.name().is_empty() {
        writeln!(w, "Subcommands:")?;
    } else {
        writeln!(w, "Subcommands for {}:", group.name())?;
    }

    let sorted = group.sorted();

    let mut aliases: HashMap<&str, Vec<&str>> = HashMap::new();
    for &command in &sorted {
        if command.as_alias().is_some() {
            aliases
                .entry(dealias(command).name())
                .or_default()
                .push(command.name());
        }
    }

    for &command in sorted.iter().filter(|c| c.as_alias().is_none()) {
        let mut names = vec![command.name()];
        if let Some(alias_names) = aliases.get(command.name()) {
            names.extend(alias_names);
        }
        writeln!(w, "\t{:<15}  {}", names.join(", "), command.synopsis())?;
    }
    writeln!(w)
}

/// Print the long usage of a single command followed by its flag defaults
pub fn explain_command(w: &mut dyn Write, command: &dyn Command) -> io::Result<()> {
    write!(w, "{}", command.usage())?;
    let mut flags = FlagSet::new(command.name());
    command.set_flags(&mut flags);
    flags.write_defaults(w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alias::alias;
    use crate::command::ExitStatus;
    use crate::context::CommandContext;
    use std::any::Any;

    struct Stub {
        name: &'static str,
        synopsis: &'static str,
    }

    impl Command for Stub {
        fn name(&self) -> &str {
            self.name
        }

        fn synopsis(&self) -> &str {
            self.synopsis
        }

        fn usage(&self) -> &str {
            "stub <arg>:\n\tDo stub things.\n"
        }

        fn set_flags(&self, flags: &mut FlagSet) {
            flags.int_flag("depth", 3, "how deep");
        }

        fn execute(&self, _ctx: &CommandContext<'_>, _flags: &FlagSet, _args: &[&dyn Any]) -> ExitStatus {
            ExitStatus::Success
        }
    }

    fn stub(name: &'static str, synopsis: &'static str) -> Rc<dyn Command> {
        Rc::new(Stub { name, synopsis })
    }

    fn render_group(group: &CommandGroup) -> String {
        let mut out = Vec::new();
        explain_group(&mut out, group).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_empty_group_renders_nothing() {
        assert_eq!(render_group(&CommandGroup::new("empty")), "");
    }

    #[test]
    fn test_group_sorted_with_aliases() {
        let list = stub("list", "list things");
        let mut group = CommandGroup::new("");
        group.push(stub("zap", "remove things"));
        group.push(Rc::new(alias("ls", list.clone())));
        group.push(list.clone());
        group.push(Rc::new(alias("dir", alias("l", list))));

        let expected = "Subcommands:\n\
                        \tlist, dir, ls    list things\n\
                        \tzap              remove things\n\n";
        assert_eq!(render_group(&group), expected);
    }

    #[test]
    fn test_named_group_header() {
        let mut group = CommandGroup::new("storage");
        group.push(stub("put", "store a value"));
        assert!(render_group(&group).starts_with("Subcommands for storage:\n"));
    }

    #[test]
    fn test_explain_command_lists_flags() {
        let mut out = Vec::new();
        explain_command(&mut out, &Stub { name: "stub", synopsis: "" }).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "stub <arg>:\n\tDo stub things.\n  -depth int\n    \thow deep (default 3)\n"
        );
    }
}
