//! Template fetcher: cache first, network second.

use std::sync::Arc;

use pagekit_cache::TemplateCache;
use reqwest::Url;
use tracing::debug;

use crate::error::FetchError;
use crate::http_client::{HttpTransport, Transport, TransportError};

/// Fetches the markup of a single template identifier.
///
/// Identifiers found in the [`TemplateCache`] are served from it; anything
/// else is requested from the network with the identifier used as URL. The
/// fetcher never writes to the cache.
pub struct TemplateFetcher<T = HttpTransport> {
    cache: Arc<TemplateCache>,
    transport: T,
    base_url: Option<Url>,
}

impl TemplateFetcher<HttpTransport> {
    /// Create a fetcher using the default HTTP transport.
    pub fn new(cache: Arc<TemplateCache>) -> Result<Self, TransportError> {
        Ok(Self::with_transport(cache, HttpTransport::new()?))
    }
}

impl<T: Transport> TemplateFetcher<T> {
    /// Create a fetcher using a custom transport.
    pub fn with_transport(cache: Arc<TemplateCache>, transport: T) -> Self {
        Self {
            cache,
            transport,
            base_url: None,
        }
    }

    /// Set the base URL relative identifiers are resolved against.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// The cache consulted before the network.
    pub fn cache(&self) -> &Arc<TemplateCache> {
        &self.cache
    }

    /// The transport used on cache misses.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Resolves an identifier to the URL requested on a cache miss.
    pub fn url_for(&self, identifier: &str) -> Result<Url, TransportError> {
        match Url::parse(identifier) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => self
                .base_url
                .as_ref()
                .and_then(|base| base.join(identifier).ok())
                .ok_or_else(|| TransportError::InvalidUrl(identifier.to_string())),
            Err(_) => Err(TransportError::InvalidUrl(identifier.to_string())),
        }
    }

    /// Fetches the markup for `identifier`.
    ///
    /// A cache hit still yields to the scheduler once before completing, so
    /// callers observe the same suspension on both paths.
    pub async fn fetch(&self, identifier: &str) -> Result<String, FetchError> {
        if let Some(markup) = self.cache.get(identifier) {
            tokio::task::yield_now().await;
            debug!("Template '{}' served from cache", identifier);
            return Ok(markup);
        }

        let url = self.url_for(identifier).map_err(|source| FetchError::Transport {
            identifier: identifier.to_string(),
            source,
        })?;

        debug!("Fetching template '{}' from {}", identifier, url);
        let response = self
            .transport
            .get(&url)
            .await
            .map_err(|source| FetchError::Transport {
                identifier: identifier.to_string(),
                source,
            })?;

        if response.is_error_status() {
            return Err(FetchError::Rejected {
                identifier: identifier.to_string(),
                status: response.status,
                body: response.body,
            });
        }

        Ok(response.body)
    }
}
