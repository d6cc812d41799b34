//! CLI argument definitions using clap
//!
//! Commands:
//! - moviestore init  [--config <path>] [--data-file <path>]
//! - moviestore serve [--config <path>] [--data-file <path>] [--port <port>]

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// moviestore - a movie catalogue API over one JSON file
#[derive(Parser, Debug)]
#[command(name = "moviestore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Path to configuration file (default: ./moviestore.json if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Backing JSON file, overrides the config file
    #[arg(long)]
    pub data_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the backing file with an empty collection if missing
    Init {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Start the HTTP server
    Serve {
        #[command(flatten)]
        common: CommonArgs,

        /// Port to listen on, overrides the config file
        #[arg(long, env = "PORT")]
        port: Option<u16>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
