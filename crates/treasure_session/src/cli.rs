//! Command-line interface for treasure_session.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Treasure Session - host-authoritative two-player treasure hunt
#[derive(Parser, Debug)]
#[command(name = "treasure_session")]
#[command(about = "Two-player hidden-treasure sessions over a peer transport", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a full local match between two automated players
    Demo {
        /// Path to session config (TOML). Defaults apply when absent.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Seed for the board and players, overriding the config
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print the resolved configuration as TOML
    Config {
        /// Path to session config (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}
