//! # subcmd
//!
//! Reference driver for `subcmd-core`: a handful of demo commands behind the
//! built-in `help`, `flags` and `commands`.

use std::ffi::OsString;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use subcmd_core::{CommandContext, Commander, ExitStatus, FlagSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod commands;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(status) => ExitCode::from(status.code()),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<ExitStatus> {
    // Installed before anything else so registration and parse events are
    // seen; -verbose can only raise the level once parsed
    let from_env = EnvFilter::try_from_default_env();
    let env_configured = from_env.is_ok();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(from_env.unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_filter_reloading();
    let log_filter = subscriber.reload_handle();
    subscriber
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to install log subscriber: {}", err))?;

    let mut args = lossy_args(std::env::args_os()).into_iter();
    let name = program_name(args.next());

    let mut commander = Commander::new(name.as_str(), Some(top_flags(&name)));
    commander.important_flag("verbose");
    commands::register(&mut commander);

    if let Err(err) = commander.parse(args) {
        return Ok(if err.is_help() {
            ExitStatus::Success
        } else {
            ExitStatus::UsageError
        });
    }

    let verbose = commander
        .top_flags()
        .and_then(|flags| flags.get_bool("verbose"))
        .unwrap_or(false);
    if verbose && !env_configured {
        log_filter
            .reload(EnvFilter::new("debug"))
            .context("failed to raise log level")?;
    }

    let token = CancellationToken::new();
    tokio::spawn(cancel_on_ctrl_c(token.clone()));

    let status = commander.execute(&CommandContext::with_token(token), &[]);
    debug!(%status, code = status.code(), "command finished");
    Ok(status)
}

/// Command-line arguments as text; invalid UTF-8 is replaced, not fatal
fn lossy_args(args: impl IntoIterator<Item = OsString>) -> Vec<String> {
    args.into_iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect()
}

fn top_flags(name: &str) -> FlagSet {
    let mut flags = FlagSet::new(name);
    flags
        .bool_flag("verbose", false, "log debug events to stderr")
        .string_flag("separator", " ", "separator placed between printed arguments");
    flags
}

/// Basename of `argv[0]`
fn program_name(arg0: Option<String>) -> String {
    arg0.as_deref()
        .and_then(|arg0| Path::new(arg0).file_name())
        .and_then(|name| name.to_str())
        .unwrap_or("subcmd")
        .to_string()
}

async fn cancel_on_ctrl_c(token: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("interrupted, cancelling command");
        token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_name_is_basename() {
        assert_eq!(program_name(Some("/usr/local/bin/tool".into())), "tool");
        assert_eq!(program_name(Some("tool".into())), "tool");
        assert_eq!(program_name(None), "subcmd");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_args_are_replaced() {
        use std::os::unix::ffi::OsStringExt;

        let args = vec![
            OsString::from("subcmd"),
            OsString::from_vec(vec![b'a', 0xff, b'b']),
        ];
        assert_eq!(lossy_args(args), ["subcmd", "a\u{fffd}b"]);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitStatus::Success.code(), 0);
        assert_eq!(ExitStatus::Failure.code(), 1);
        assert_eq!(ExitStatus::UsageError.code(), 2);
    }
}
