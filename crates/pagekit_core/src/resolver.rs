//! Page resolver: candidate fallback over the template fetcher.

use std::sync::Arc;

use pagekit_cache::TemplateCache;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{ConfigError, PagekitConfig, TransportFaultPolicy};
use crate::error::FetchError;
use crate::expression::{CandidateEvaluator, ExpressionError, PageAttributeExpression};
use crate::fetcher::TemplateFetcher;
use crate::http_client::{HttpTransport, Transport};
use crate::normalize::normalize_page_html;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Must specify a page.")]
    MissingPage,
    #[error("Expression error: {0}")]
    Expression(#[from] ExpressionError),
    #[error("No page could be loaded after {attempts} candidate(s): {last}")]
    Exhausted {
        attempts: usize,
        #[source]
        last: FetchError,
    },
    #[error("Transport fault: {0}")]
    TransportFault(#[source] FetchError),
}

impl ResolveError {
    /// The fetch failure that ended the resolution, if any.
    pub fn last_failure(&self) -> Option<&FetchError> {
        match self {
            ResolveError::Exhausted { last, .. } | ResolveError::TransportFault(last) => Some(last),
            ResolveError::MissingPage | ResolveError::Expression(_) => None,
        }
    }
}

/// Resolves page references into normalized page markup.
///
/// Candidates are tried strictly one after another, in the order the
/// evaluator returns them; the first one that fetches successfully wins and
/// no candidate is tried twice.
pub struct PageResolver<E = PageAttributeExpression, T = HttpTransport> {
    evaluator: E,
    fetcher: TemplateFetcher<T>,
    transport_faults: TransportFaultPolicy,
}

impl PageResolver<PageAttributeExpression, HttpTransport> {
    /// Builds a resolver from configuration, sharing `cache`.
    pub fn from_config(
        config: &PagekitConfig,
        cache: Arc<TemplateCache>,
    ) -> Result<Self, ConfigError> {
        let transport = HttpTransport::builder().timeout(config.timeout()).build()?;

        let mut fetcher = TemplateFetcher::with_transport(cache, transport);
        if let Some(base_url) = config.base_url()? {
            fetcher = fetcher.with_base_url(base_url);
        }

        let evaluator = PageAttributeExpression::with_variables(config.variables.clone());

        Ok(Self::new(evaluator, fetcher).with_transport_faults(config.transport_faults))
    }
}

impl<E: CandidateEvaluator, T: Transport> PageResolver<E, T> {
    pub fn new(evaluator: E, fetcher: TemplateFetcher<T>) -> Self {
        Self {
            evaluator,
            fetcher,
            transport_faults: TransportFaultPolicy::default(),
        }
    }

    pub fn with_transport_faults(mut self, policy: TransportFaultPolicy) -> Self {
        self.transport_faults = policy;
        self
    }

    pub fn fetcher(&self) -> &TemplateFetcher<T> {
        &self.fetcher
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Resolves `reference` into normalized page markup.
    ///
    /// When every candidate fails, the error carries the failure of the last
    /// candidate tried.
    pub async fn resolve(&self, reference: &str) -> Result<String, ResolveError> {
        if reference.trim().is_empty() {
            return Err(ResolveError::MissingPage);
        }

        let candidates = self.evaluator.evaluate(reference)?;
        let mut attempts = 0;
        let mut last_error = None;

        for candidate in candidates {
            attempts += 1;
            debug!("Trying page candidate '{}'", candidate);

            match self.fetcher.fetch(&candidate).await {
                Ok(html) => return Ok(normalize_page_html(&html)),
                Err(e)
                    if e.is_transport() && self.transport_faults == TransportFaultPolicy::Abort =>
                {
                    return Err(ResolveError::TransportFault(e));
                }
                Err(e) => {
                    debug!("Page candidate '{}' failed: {}", candidate, e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(last) => {
                warn!("Failed to resolve page '{}': {}", reference, last);
                Err(ResolveError::Exhausted { attempts, last })
            }
            None => Err(ResolveError::MissingPage),
        }
    }
}
