//! Normalize command implementation

use std::io::Read;
use std::path::Path;

use miette::{IntoDiagnostic, Result};
use pagekit_core::normalize_page_html;

pub fn run_normalize(file: Option<&Path>) -> Result<()> {
    let html = match file {
        Some(path) => std::fs::read_to_string(path).into_diagnostic()?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).into_diagnostic()?;
            buf
        }
    };

    println!("{}", normalize_page_html(&html));
    Ok(())
}
