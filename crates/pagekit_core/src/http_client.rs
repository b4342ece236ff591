//! HTTP transport used to fetch templates that are not cached.

use std::future::Future;
use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

/// Error type for transport-level failures.
///
/// HTTP error statuses are not transport failures; they are reported through
/// [`TransportResponse::status`].
#[derive(Debug, Error)]
pub enum TransportError {
    /// The identifier could not be turned into a URL.
    #[error("Invalid URL '{0}'")]
    InvalidUrl(String),

    /// Network request failed.
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Failed to build HTTP client.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuildError(String),
}

/// Response to a single GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl TransportResponse {
    /// Creates a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns whether the status is in the client or server error range.
    pub fn is_error_status(&self) -> bool {
        (400..600).contains(&self.status)
    }
}

/// Performs one GET request per call.
pub trait Transport: Send + Sync {
    /// Fetches `url` and returns its status and body text.
    fn get(
        &self,
        url: &Url,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send;
}

/// Default timeout for HTTP requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default `User-Agent` header.
pub const DEFAULT_USER_AGENT: &str = concat!("pagekit/", env!("CARGO_PKG_VERSION"));

/// [`Transport`] backed by a reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Duration,
}

/// Builder for [`HttpTransport`].
#[derive(Debug)]
pub struct HttpTransportBuilder {
    timeout: Duration,
    user_agent: String,
}

impl HttpTransport {
    /// Create a new builder for HttpTransport.
    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder {
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Create a transport with default settings.
    pub fn new() -> Result<Self, TransportError> {
        Self::builder().build()
    }

    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<TransportResponse, TransportError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(TransportResponse { status, body })
    }
}

impl HttpTransportBuilder {
    /// Set timeout for HTTP requests.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the HttpTransport.
    pub fn build(self) -> Result<HttpTransport, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent)
            .build()
            .map_err(|e| TransportError::ClientBuildError(e.to_string()))?;

        Ok(HttpTransport {
            client,
            timeout: self.timeout,
        })
    }
}
