//! pagekit CLI
//!
//! Resolves page references into normalized page markup using embedded
//! template declarations, registration events and the network.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use miette::Result;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(has_errors) => {
            if has_errors {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli) -> Result<bool> {
    match &cli.command {
        Commands::Resolve {
            reference,
            declarations,
            events,
            variables,
            base_url,
        } => commands::resolve::run_resolve(
            cli,
            reference,
            declarations,
            events.as_deref(),
            variables,
            base_url.as_deref(),
        ),
        Commands::Scan { files } => commands::scan::run_scan(files).map(|_| false),
        Commands::Normalize { file } => {
            commands::normalize::run_normalize(file.as_deref()).map(|_| false)
        }
    }
}
