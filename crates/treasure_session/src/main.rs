//! Treasure Session - CLI
//!
//! Runs local matches and inspects configuration.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use std::path::Path;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;
use treasure_session::{PlayerSlot, SessionConfig, run_demo};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Demo { config, seed } => demo(config.as_deref(), seed).await,
        Command::Config { config } => show_config(config.as_deref()),
    }
}

/// Loads the config file if given, otherwise defaults.
#[instrument]
fn load_config(path: Option<&Path>) -> Result<SessionConfig> {
    match path {
        Some(path) => Ok(SessionConfig::from_file(path)?),
        None => {
            info!("No config file, using defaults");
            Ok(SessionConfig::default())
        }
    }
}

/// Plays a local match and prints the result.
async fn demo(path: Option<&Path>, seed: Option<u64>) -> Result<()> {
    let config = load_config(path)?.with_seed(seed);
    let report = run_demo(&config).await?;

    println!("{}", report.board().display());
    println!();
    for (slot, message) in PlayerSlot::ALL.into_iter().zip(report.messages()) {
        println!("{slot}: {}", message.unwrap_or("(no status)"));
    }
    Ok(())
}

/// Prints the resolved configuration.
fn show_config(path: Option<&Path>) -> Result<()> {
    let config = load_config(path)?;
    print!("{}", config.to_toml()?);
    Ok(())
}
