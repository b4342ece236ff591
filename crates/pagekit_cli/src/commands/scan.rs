//! Scan command implementation

use std::path::PathBuf;

use miette::{IntoDiagnostic, Result, WrapErr};
use pagekit_cache::scan_declarations;
use tracing::info;

pub fn run_scan(files: &[PathBuf]) -> Result<()> {
    for file in files {
        let html = std::fs::read_to_string(file)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read {}", file.display()))?;

        let declarations = scan_declarations(&html);
        info!(
            "{}: {} template declaration(s)",
            file.display(),
            declarations.len()
        );

        for declaration in declarations {
            println!("{}\t{}", declaration.kind, declaration.id);
        }
    }

    Ok(())
}
