//! Error types for template fetch operations.

use thiserror::Error;

use crate::http_client::TransportError;

/// Error type for fetching a single template.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a client or server error status.
    #[error("Template '{identifier}' rejected with HTTP {status}")]
    Rejected {
        identifier: String,
        status: u16,
        body: String,
    },

    /// The request itself failed.
    #[error("The page is not found: {identifier}")]
    Transport {
        identifier: String,
        #[source]
        source: TransportError,
    },
}

impl FetchError {
    /// Identifier of the candidate that failed.
    pub fn identifier(&self) -> &str {
        match self {
            FetchError::Rejected { identifier, .. } | FetchError::Transport { identifier, .. } => {
                identifier
            }
        }
    }

    /// Response body of a rejected fetch.
    pub fn body(&self) -> Option<&str> {
        match self {
            FetchError::Rejected { body, .. } => Some(body),
            FetchError::Transport { .. } => None,
        }
    }

    /// Returns whether the failure happened below HTTP.
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport { .. })
    }
}
