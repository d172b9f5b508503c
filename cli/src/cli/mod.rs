pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nowplaying-overlay")]
#[command(author, version, about = "Now-playing overlay server for OBS browser sources")]
pub struct Cli {
    /// Path to config file (checked in order: local config.toml, ~/.config/nowplaying-overlay/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the overlay server
    Start {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show whether the overlay server is running
    Status,

    /// Print the relay URL that fetches the given target
    Encode {
        /// Absolute URL to relay
        url: String,
    },
}
