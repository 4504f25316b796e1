//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Activity timer.
///
/// Keeps a list of activities and accrues wall-clock time to whichever one is
/// running. At most one activity runs at a time.
#[derive(Debug, Parser)]
#[command(name = "ti", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start an interactive session driven by the system clock (default).
    Run,

    /// Run a session script against a simulated clock.
    ///
    /// `advance <ms>` moves the clock forward and ticks. Reads stdin when no
    /// file is given.
    Replay {
        /// Script file with one session command per line.
        file: Option<PathBuf>,
    },
}
