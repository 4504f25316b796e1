//! Interactive session driven by the system clock.
//!
//! Ticks and stdin lines are multiplexed on a single-threaded runtime, so a
//! tick is just another event in the same queue as user commands and never
//! races with them.

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use ti_core::Tracker;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{MissedTickBehavior, interval};

use crate::Config;
use crate::session::{Flow, Session, SessionCommand, total_elapsed};

pub fn run(config: &Config) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;
    runtime.block_on(event_loop(config))
}

async fn event_loop(config: &Config) -> Result<()> {
    let tracker = Tracker::with_system_clock(&config.tracker_config());
    let mut session = Session::new(tracker, true);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "type 'help' for commands")?;
    session.write_list(&mut out)?;
    out.flush()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = interval(Duration::from_millis(config.tick_interval_ms.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                session.tick();
            }
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                // Credit time up to this moment before the command can switch rows.
                session.tick();

                match SessionCommand::parse_line(&line) {
                    None => {}
                    Some(Err(err)) => writeln!(out, "! {err:#}")?,
                    Some(Ok(command)) => {
                        if session.execute(&command, &mut out)? == Flow::Quit {
                            break;
                        }
                    }
                }
                out.flush()?;
            }
        }
    }

    session.tick();
    tracing::debug!(caption = %session.tracker().caption(), "session ended");
    writeln!(out, "total {}", total_elapsed(session.tracker()))?;
    Ok(())
}
