//! Resolve command implementation

use std::path::{Path, PathBuf};
use std::sync::Arc;

use miette::{IntoDiagnostic, Result, WrapErr};
use pagekit_cache::spawn_listener;
use pagekit_core::{PageResolver, TemplateCache, TemplateLoaded};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::cli::Cli;

use super::load_config;

pub fn run_resolve(
    cli: &Cli,
    reference: &str,
    declarations: &[PathBuf],
    events: Option<&Path>,
    variables: &[(String, String)],
    base_url: Option<&str>,
) -> Result<bool> {
    let mut config = load_config(cli)?;
    if let Some(url) = base_url {
        config.base_url = Some(url.to_string());
    }
    for (name, value) in variables {
        config.variables.insert(name.clone(), value.clone());
    }

    let cache = Arc::new(TemplateCache::new());

    let mut documents = config.declaration_paths();
    documents.extend(declarations.iter().cloned());
    for document in &documents {
        let html = std::fs::read_to_string(document)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read {}", document.display()))?;
        let count = cache.register_declarations(&html);
        info!("Registered {} template(s) from {}", count, document.display());
    }

    let resolver = PageResolver::from_config(&config, Arc::clone(&cache)).into_diagnostic()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .into_diagnostic()?;

    let result = runtime.block_on(async {
        if let Some(path) = events {
            apply_events(&cache, path).await?;
        }
        Ok::<_, miette::Report>(resolver.resolve(reference).await)
    })?;

    match result {
        Ok(html) => {
            println!("{html}");
            Ok(false)
        }
        Err(e) => {
            error!("{}", e);
            Ok(true)
        }
    }
}

/// Feeds registration events through the cache listener and waits until all
/// of them have been applied.
async fn apply_events(cache: &Arc<TemplateCache>, path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read {}", path.display()))?;

    let (tx, rx) = mpsc::unbounded_channel();
    let listener = spawn_listener(Arc::clone(cache), rx);

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<TemplateLoaded>(line) {
            Ok(event) => {
                if tx.send(event).is_err() {
                    break;
                }
            }
            Err(e) => warn!("{}:{}: invalid event: {}", path.display(), index + 1, e),
        }
    }
    drop(tx);

    listener.await.into_diagnostic()
}
