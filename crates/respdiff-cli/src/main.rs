//! respdiff command-line driver
//!
//! Loads already-fetched responses from disk and reports how a candidate
//! API diverges from the reference. Exits with status 1 when any compared
//! pair differs.

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let matched = match cli.command {
        Commands::Compare {
            reference,
            candidate,
            endpoint,
            options,
        } => commands::compare(&reference, &candidate, endpoint, &options, cli.json)?,
        Commands::Batch {
            dir,
            filter,
            options,
        } => commands::batch(&dir, filter.as_deref(), &options, cli.json)?,
    };

    Ok(if matched {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
