//! # Commander Integration Tests
//!
//! End-to-end dispatch through the public API only.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use subcmd_core::{
    alias, dealias, Command, CommandContext, Commander, ExitStatus, FlagSet, Sink,
};
use tokio_util::sync::CancellationToken;

/// Records what it was called with
#[derive(Default)]
struct Recorder {
    name: &'static str,
    seen: Rc<RefCell<Vec<String>>>,
}

impl Command for Recorder {
    fn name(&self) -> &str {
        self.name
    }

    fn synopsis(&self) -> &str {
        "record arguments"
    }

    fn usage(&self) -> &str {
        "record [-tag t] <args>\n"
    }

    fn set_flags(&self, flags: &mut FlagSet) {
        flags
            .string_flag("tag", "none", "tag to record")
            .int_flag("n", 1, "repeat count");
    }

    fn execute(&self, ctx: &CommandContext<'_>, flags: &FlagSet, args: &[&dyn Any]) -> ExitStatus {
        if ctx.is_cancelled() {
            return ExitStatus::Failure;
        }
        let mut seen = self.seen.borrow_mut();
        seen.push(format!("tag={}", flags.get_str("tag").unwrap_or_default()));
        seen.push(format!("n={}", flags.get_int("n").unwrap_or_default()));
        seen.extend(flags.args().iter().cloned());
        for extra in args {
            if let Some(s) = extra.downcast_ref::<&str>() {
                seen.push(format!("extra={}", s));
            }
        }
        ExitStatus::Success
    }
}

fn commander(top: FlagSet) -> Commander {
    let mut commander = Commander::new("tool", Some(top));
    commander.set_output(Sink::buffer());
    commander.set_error(Sink::buffer());
    commander
}

fn top_flags() -> FlagSet {
    let mut top = FlagSet::new("tool");
    top.bool_flag("verbose", false, "log more")
        .string_flag("config", "", "config file");
    top.set_output(Sink::buffer());
    top
}

#[test]
fn test_groups_visit_sorted_empty_first() {
    let mut commander = commander(top_flags());
    commander
        .register(Commander::help_command(), "zeta")
        .register(Commander::flags_command(), "")
        .register(Commander::commands_command(), "alpha");

    let mut labels = Vec::new();
    commander.visit_groups(|group| labels.push(group.name().to_string()));
    assert_eq!(labels, ["", "alpha", "zeta"]);

    let groups = commander.groups();
    let stored: Vec<_> = groups.iter().map(|g| g.name()).collect();
    assert_eq!(stored, ["zeta", "", "alpha"]);
}

#[test]
fn test_help_listing_sorted_by_name() {
    let mut commander = commander(top_flags());
    commander
        .register(Commander::help_command(), "")
        .register(Commander::flags_command(), "")
        .register(Commander::commands_command(), "");
    commander.parse(["help"]).unwrap();

    assert_eq!(commander.execute(&CommandContext::new(), &[]), ExitStatus::Success);
    let out = commander.output().contents();
    let commands = out.find("\tcommands").unwrap();
    let flags = out.find("\tflags").unwrap();
    let help = out.find("\thelp").unwrap();
    assert!(commands < flags && flags < help);
    assert!(out.contains("Use \"tool flags\" for a list of top-level flags"));
}

#[test]
fn test_dealias_unwraps_chains() {
    let base = Rc::new(Recorder {
        name: "record",
        ..Default::default()
    });
    let chained = alias("c", alias("b", alias("a", base.clone())));

    assert_eq!(chained.name(), "c");
    assert_eq!(dealias(&chained).name(), "record");
    assert_eq!(dealias(base.as_ref()).name(), "record");
}

#[test]
fn test_same_label_appends_to_one_group() {
    let mut commander = commander(top_flags());
    commander
        .register(Commander::help_command(), "misc")
        .register(Commander::flags_command(), "misc");

    assert_eq!(commander.groups().len(), 1);
    assert_eq!(commander.groups()[0].len(), 2);
}

#[test]
fn test_missing_verb_is_usage_error() {
    let mut commander = commander(top_flags());
    commander.register(Commander::help_command(), "");
    commander.parse(["-verbose"]).unwrap();

    assert_eq!(commander.execute(&CommandContext::new(), &[]), ExitStatus::UsageError);
    assert!(commander
        .error()
        .contents()
        .starts_with("Usage: tool <flags> <subcommand> <subcommand args>\n"));
}

#[test]
fn test_commands_lists_registration_order() {
    let mut commander = commander(top_flags());
    commander
        .register(Commander::help_command(), "")
        .register(Commander::flags_command(), "")
        .register(Commander::commands_command(), "");
    commander.parse(["commands"]).unwrap();

    assert_eq!(commander.execute(&CommandContext::new(), &[]), ExitStatus::Success);
    assert_eq!(commander.output().contents(), "help\nflags\ncommands\n");
}

#[test]
fn test_help_for_unknown_subcommand_fails() {
    let mut commander = commander(top_flags());
    commander.register(Commander::help_command(), "");
    commander.parse(["help", "bogus"]).unwrap();

    assert_eq!(commander.execute(&CommandContext::new(), &[]), ExitStatus::Failure);
    assert!(commander
        .error()
        .contents()
        .contains("Subcommand bogus not understood"));
}

#[test]
#[should_panic(expected = "Important flag (missing) is not defined")]
fn test_undefined_important_flag_panics_on_help() {
    let mut commander = commander(top_flags());
    commander.register(Commander::help_command(), "");
    commander.important_flag("missing");
    commander.parse(["help"]).unwrap();
    commander.execute(&CommandContext::new(), &[]);
}

#[test]
fn test_important_flags_in_top_level_help() {
    let mut commander = commander(top_flags());
    commander.register(Commander::help_command(), "");
    commander.important_flag("verbose").important_flag("config");
    commander.parse(["help"]).unwrap();

    assert_eq!(commander.execute(&CommandContext::new(), &[]), ExitStatus::Success);
    let out = commander.output().contents();
    assert!(out.ends_with(
        "\nTop-level flags (use \"tool flags\" for a full list):\n  -config=: config file\n  -verbose=false: log more\n"
    ));
}

#[test]
fn test_flags_and_args_reach_the_command() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut commander = commander(top_flags());
    commander.register(
        Recorder {
            name: "record",
            seen: seen.clone(),
        },
        "data",
    );
    commander
        .parse(["-verbose", "-config", "x.toml", "record", "-tag", "-odd", "-n=4", "a", "-b"])
        .unwrap();

    assert_eq!(commander.top_flags().unwrap().get_bool("verbose"), Some(true));
    assert_eq!(commander.top_flags().unwrap().get_str("config"), Some("x.toml"));

    let extra: &str = "ctx";
    let status = commander.execute(&CommandContext::new(), &[&extra as &dyn Any]);
    assert_eq!(status, ExitStatus::Success);
    assert_eq!(*seen.borrow(), ["tag=-odd", "n=4", "a", "-b", "extra=ctx"]);
}

#[test]
fn test_alias_dispatches_to_wrapped_command() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut commander = commander(top_flags());
    commander.register(
        alias(
            "rec",
            Recorder {
                name: "record",
                seen: seen.clone(),
            },
        ),
        "data",
    );
    commander.parse(["rec", "x"]).unwrap();

    assert_eq!(commander.execute(&CommandContext::new(), &[]), ExitStatus::Success);
    assert_eq!(*seen.borrow(), ["tag=none", "n=1", "x"]);
}

#[test]
fn test_cancellation_token_is_forwarded() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut commander = commander(top_flags());
    commander.register(
        Recorder {
            name: "record",
            seen: seen.clone(),
        },
        "",
    );
    commander.parse(["record"]).unwrap();

    let token = CancellationToken::new();
    token.cancel();
    let status = commander.execute(&CommandContext::with_token(token), &[]);
    assert_eq!(status, ExitStatus::Failure);
    assert!(seen.borrow().is_empty());
}

#[test]
fn test_bad_top_level_flag_is_reported() {
    let mut commander = commander(top_flags());
    commander.register(Commander::help_command(), "");

    let err = commander.parse(["-config"]).unwrap_err();
    assert_eq!(err.to_string(), "flag needs an argument: -config");
    assert!(commander.error().contents().starts_with("Usage: tool "));
}

#[test]
fn test_bad_subcommand_value_is_usage_error() {
    let mut commander = commander(top_flags());
    commander.register(
        Recorder {
            name: "record",
            ..Default::default()
        },
        "",
    );
    commander.parse(["record", "-n", "lots"]).unwrap();

    assert_eq!(commander.execute(&CommandContext::new(), &[]), ExitStatus::UsageError);
    let err = commander.error().contents();
    assert!(err.contains("invalid value \"lots\" for flag -n"));
    assert!(err.contains("record [-tag t] <args>\n"));
}
