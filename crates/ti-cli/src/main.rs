use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ti_cli::commands::{replay, run};
use ti_cli::{Cli, Commands, Config};

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Session output owns stdout; logs go to stderr
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = load_config(cli.config.as_deref())?;

    match &cli.command {
        Some(Commands::Replay { file }) => {
            let script = replay::read_script(file.as_deref())?;
            let stdout = std::io::stdout();
            replay::run(&mut stdout.lock(), &config, &script)?;
        }
        Some(Commands::Run) | None => {
            run::run(&config)?;
        }
    }

    Ok(())
}
