//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// pagekit - resolve page references into page markup
#[derive(Parser)]
#[command(name = "pagekit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a page reference and print the normalized markup
    Resolve {
        /// Page reference, e.g. "page-${platform}.html, page.html"
        reference: String,

        /// Documents to scan for embedded template declarations
        #[arg(short, long = "declarations", value_name = "FILE")]
        declarations: Vec<PathBuf>,

        /// Template registration events to apply, one JSON object per line
        #[arg(long, value_name = "FILE")]
        events: Option<PathBuf>,

        /// Expression variable
        #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_variable)]
        variables: Vec<(String, String)>,

        /// Base URL for relative page identifiers
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,
    },

    /// List the template declarations embedded in documents
    Scan {
        /// Documents to scan
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Normalize page markup from a file or stdin
    Normalize {
        /// Markup file (stdin when omitted)
        file: Option<PathBuf>,
    },
}

fn parse_variable(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{raw}'")),
    }
}
