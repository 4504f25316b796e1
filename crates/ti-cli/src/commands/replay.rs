//! Scripted session against a simulated clock.

use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use ti_core::{Clock, ManualClock, Tracker};

use crate::Config;
use crate::session::{Flow, Session, SessionCommand};

/// Reads a script from a file, or from stdin when no path is given.
pub fn read_script(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut script = String::new();
            std::io::stdin()
                .read_to_string(&mut script)
                .context("failed to read stdin")?;
            Ok(script)
        }
    }
}

/// Runs every line of `script`. The clock starts at zero and only moves on `advance`.
pub fn run<W: Write>(writer: &mut W, config: &Config, script: &str) -> Result<()> {
    let clock = ManualClock::starting_at(0);
    let tracker = Tracker::new(clock.clone(), &config.tracker_config());
    let mut session = Session::new(tracker, false);

    for (index, line) in script.lines().enumerate() {
        match SessionCommand::parse_line(line) {
            None => {}
            Some(Err(err)) => writeln!(writer, "! line {}: {err:#}", index + 1)?,
            Some(Ok(SessionCommand::Advance(ms))) => {
                clock.advance(ms);
                session.tick();
            }
            Some(Ok(command)) => {
                if session.execute(&command, writer)? == Flow::Quit {
                    break;
                }
            }
        }
    }

    tracing::debug!(now = clock.now_ms(), "replay finished");
    Ok(())
}
