//! Subcommand implementations

pub mod normalize;
pub mod resolve;
pub mod scan;

use miette::{IntoDiagnostic, Result};
use pagekit_core::PagekitConfig;
use tracing::debug;

use crate::cli::Cli;

/// Loads the configuration named on the command line, or the one found in
/// the working directory, or the defaults.
pub fn load_config(cli: &Cli) -> Result<PagekitConfig> {
    if let Some(path) = &cli.config {
        return PagekitConfig::from_file(path).into_diagnostic();
    }

    let cwd = std::env::current_dir().into_diagnostic()?;
    match PagekitConfig::find(&cwd) {
        Some(path) => {
            debug!("Using config {}", path.display());
            PagekitConfig::from_file(&path).into_diagnostic()
        }
        None => Ok(PagekitConfig::default()),
    }
}
