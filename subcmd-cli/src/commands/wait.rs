use std::any::Any;
use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};

use subcmd_core::{Command, CommandContext, ExitStatus, FlagSet};
use tracing::{debug, warn};

use super::{output, written};

/// How often the cancellation token is polled
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// `wait [-seconds n]`: sleep, giving up early when cancelled
#[derive(Debug, Clone, Copy, Default)]
pub struct WaitCommand;

impl Command for WaitCommand {
    fn name(&self) -> &str {
        "wait"
    }

    fn synopsis(&self) -> &str {
        "sleep until the time is up or interrupted"
    }

    fn usage(&self) -> &str {
        "wait [-seconds n]:\n\
         \tSleep for the given number of seconds. Ctrl-C cancels the wait\n\
         \tand the command fails.\n"
    }

    fn set_flags(&self, flags: &mut FlagSet) {
        flags.uint_flag("seconds", 1, "seconds to wait");
    }

    fn execute(&self, ctx: &CommandContext<'_>, flags: &FlagSet, _args: &[&dyn Any]) -> ExitStatus {
        if flags.narg() != 0 {
            flags.usage();
            return ExitStatus::UsageError;
        }

        let seconds = flags.get_uint("seconds").unwrap_or(1);
        // Past the clock's range the wait only ends on cancellation
        let deadline = Instant::now().checked_add(Duration::from_secs(seconds));
        debug!(seconds, bounded = deadline.is_some(), "waiting");

        loop {
            if ctx.is_cancelled() {
                warn!("wait cancelled");
                return ExitStatus::Failure;
            }
            let pause = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        break;
                    }
                    POLL_INTERVAL.min(deadline - now)
                }
                None => POLL_INTERVAL,
            };
            thread::sleep(pause);
        }

        written(writeln!(output(ctx), "waited {}s", seconds), "wait result")
    }
}
