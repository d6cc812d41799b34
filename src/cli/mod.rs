//! CLI module for moviestore
//!
//! Provides command-line interface for:
//! - init: Create the backing file with an empty collection
//! - serve: Load configuration and run the HTTP API

mod args;
mod commands;
mod config;
mod errors;

pub use args::{Cli, Command, CommonArgs};
pub use commands::{init, run, run_command, serve};
pub use config::{Config, DEFAULT_CONFIG_PATH};
pub use errors::{CliError, CliErrorCode, CliResult};
