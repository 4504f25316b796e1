//! Session commands and their effect on a tracker.
//!
//! Rows are addressed by their 1-based display position, the number shown
//! by `list`.

use std::io::Write;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use ti_core::{Clock, RowId, RowSlot, RowStatus, Tracker, format_elapsed};

pub const HELP: &str = "\
commands:
  add [name]                     add an activity
  remove <n>                     remove activity n
  rename <n> [text]              rename (empty text restores the default name)
  toggle <n>                     start or stop activity n
  pause | resume                 pause the running activity, or resume it
  reset <n>                      clear activity n's time
  edit <n> <minutes>             add (or subtract) minutes
  transfer <from> <to> <minutes> move minutes between activities
  grab <n> | hover <y> | drop    drag activity n to pointer position y
  cancel                         abandon a drag
  list | json | caption          show activities
  advance <ms>                   move the clock forward (replay only)
  quit";

/// One line of session input.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Add(Option<String>),
    Remove(usize),
    Rename(usize, String),
    Toggle(usize),
    Pause,
    Resume,
    Reset(usize),
    Edit { row: usize, minutes: String },
    Transfer { from: usize, to: usize, minutes: String },
    Grab(usize),
    Hover(f64),
    Drop,
    Cancel,
    List,
    Json,
    Caption,
    Advance(i64),
    Help,
    Quit,
}

impl SessionCommand {
    /// Parses a line, returning `None` for blank lines and `#` comments.
    pub fn parse_line(line: &str) -> Option<Result<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        Some(line.parse())
    }

    /// True for commands that change the tracker.
    pub const fn mutates(&self) -> bool {
        !matches!(
            self,
            Self::List | Self::Json | Self::Caption | Self::Help | Self::Quit
        )
    }
}

impl FromStr for SessionCommand {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (word, rest) = s.split_once(char::is_whitespace).unwrap_or((s, ""));
        let rest = rest.trim();
        let mut args = rest.split_whitespace();

        let command = match word {
            "add" => Self::Add((!rest.is_empty()).then(|| rest.to_string())),
            "remove" | "rm" => Self::Remove(position(args.next())?),
            "rename" => {
                let (n, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                Self::Rename(position(Some(n).filter(|n| !n.is_empty()))?, text.trim().to_string())
            }
            "toggle" | "t" => Self::Toggle(position(args.next())?),
            "pause" => Self::Pause,
            "resume" => Self::Resume,
            "reset" => Self::Reset(position(args.next())?),
            "edit" => Self::Edit {
                row: position(args.next())?,
                minutes: args.next().context("missing minutes")?.to_string(),
            },
            "transfer" => Self::Transfer {
                from: position(args.next())?,
                to: position(args.next())?,
                minutes: args.next().context("missing minutes")?.to_string(),
            },
            "grab" => Self::Grab(position(args.next())?),
            "hover" => {
                let y = args.next().context("missing pointer position")?;
                Self::Hover(y.parse().with_context(|| format!("invalid pointer position: {y}"))?)
            }
            "drop" => Self::Drop,
            "cancel" => Self::Cancel,
            "list" | "ls" => Self::List,
            "json" => Self::Json,
            "caption" => Self::Caption,
            "advance" => {
                let ms = args.next().context("missing milliseconds")?;
                Self::Advance(ms.parse().with_context(|| format!("invalid milliseconds: {ms}"))?)
            }
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => bail!("unknown command: {other} (try 'help')"),
        };

        if args.next().is_some() && !matches!(command, Self::Add(_) | Self::Rename(..)) {
            bail!("too many arguments for '{word}'");
        }
        Ok(command)
    }
}

fn position(arg: Option<&str>) -> Result<usize> {
    let arg = arg.context("missing activity number")?;
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => bail!("invalid activity number: {arg}"),
    }
}

/// Whether the session loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Applies commands to a tracker and writes their visible output.
pub struct Session<C: Clock> {
    tracker: Tracker<C>,
    /// Print the list after every change.
    echo_list: bool,
}

impl<C: Clock> Session<C> {
    pub const fn new(tracker: Tracker<C>, echo_list: bool) -> Self {
        Self { tracker, echo_list }
    }

    pub const fn tracker(&self) -> &Tracker<C> {
        &self.tracker
    }

    pub fn tick(&mut self) -> u64 {
        self.tracker.tick()
    }

    /// Runs one command. Rejected input is reported on `out` and the session continues.
    pub fn execute<W: Write>(&mut self, command: &SessionCommand, out: &mut W) -> Result<Flow> {
        tracing::debug!(?command, "session command");

        if let Err(err) = self.apply(command, out) {
            writeln!(out, "! {err:#}")?;
            return Ok(Flow::Continue);
        }

        if *command == SessionCommand::Quit {
            return Ok(Flow::Quit);
        }
        if self.echo_list && command.mutates() {
            self.write_list(out)?;
        }
        Ok(Flow::Continue)
    }

    fn apply<W: Write>(&mut self, command: &SessionCommand, out: &mut W) -> Result<()> {
        match command {
            SessionCommand::Add(name) => {
                self.tracker.add_row(name.as_deref());
            }
            SessionCommand::Remove(n) => {
                let id = self.row(*n)?;
                self.tracker.remove_row(id);
            }
            SessionCommand::Rename(n, text) => {
                let id = self.row(*n)?;
                self.tracker.rename_row(id, text);
            }
            SessionCommand::Toggle(n) => {
                let id = self.row(*n)?;
                self.tracker.toggle(id);
            }
            SessionCommand::Pause => self.tracker.pause(),
            SessionCommand::Resume => self.tracker.resume(),
            SessionCommand::Reset(n) => {
                let id = self.row(*n)?;
                self.tracker.reset_time(id);
            }
            SessionCommand::Edit { row, minutes } => {
                let id = self.row(*row)?;
                self.tracker.edit_minutes(id, None, minutes)?;
            }
            SessionCommand::Transfer { from, to, minutes } => {
                let from = self.row(*from)?;
                let to = self.row(*to)?;
                self.tracker.edit_minutes(to, Some(from), minutes)?;
            }
            SessionCommand::Grab(n) => {
                let id = self.row(*n)?;
                if !self.tracker.begin_drag(id) {
                    bail!("already dragging");
                }
            }
            SessionCommand::Hover(y) => {
                self.tracker
                    .update_drag(*y)
                    .context("nothing is being dragged")?;
            }
            SessionCommand::Drop => {
                if !self.tracker.end_drag() {
                    bail!("nothing is being dragged");
                }
            }
            SessionCommand::Cancel => {
                if !self.tracker.cancel_drag() {
                    bail!("nothing is being dragged");
                }
            }
            SessionCommand::List => self.write_list(out)?,
            SessionCommand::Json => {
                serde_json::to_writer_pretty(&mut *out, &self.tracker.snapshot())?;
                writeln!(out)?;
            }
            SessionCommand::Caption => writeln!(out, "{}", self.tracker.caption())?,
            SessionCommand::Advance(_) => bail!("advance is only available in replay"),
            SessionCommand::Help => writeln!(out, "{HELP}")?,
            SessionCommand::Quit => {}
        }
        Ok(())
    }

    fn row(&self, n: usize) -> Result<RowId> {
        self.tracker
            .row_at(n - 1)
            .ok_or_else(|| anyhow!("no activity at position {n}"))
    }

    /// Writes one line per slot, e.g. `[>] 2   0:01:05  Email`.
    pub fn write_list<W: Write>(&self, out: &mut W) -> Result<()> {
        let snapshot = self.tracker.snapshot();
        let floating = snapshot.rows.iter().find(|row| row.floating);

        for (index, slot) in snapshot.order.iter().enumerate() {
            let n = index + 1;
            match slot {
                RowSlot::Row(id) => {
                    let Some(row) = snapshot.rows.iter().find(|row| row.id == *id) else {
                        continue;
                    };
                    let marker = match row.status {
                        RowStatus::Running => '>',
                        RowStatus::Held => '=',
                        RowStatus::Stopped => ' ',
                    };
                    writeln!(out, "[{marker}] {n:<2} {:>8}  {}", row.elapsed, row.name)?;
                }
                RowSlot::Placeholder => {
                    let name = floating.map_or("activity", |row| row.name.as_str());
                    writeln!(out, "[+] {n:<2} {:>8}  drop {name} here", "--:--:--")?;
                }
            }
        }
        if snapshot.order.is_empty() {
            writeln!(out, "no activities")?;
        }
        Ok(())
    }
}

/// Total time across all activities, for the session summary.
pub fn total_elapsed<C: Clock>(tracker: &Tracker<C>) -> String {
    // Snapshot rows include one held by a drag.
    let total = tracker.snapshot().rows.iter().map(|row| row.elapsed_ms).sum();
    format_elapsed(total)
}
