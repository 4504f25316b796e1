//! Activity timer CLI library.
//!
//! This crate provides the command-line front end for the timer.

mod cli;
pub mod commands;
mod config;
pub mod session;

pub use cli::{Cli, Commands};
pub use config::Config;
