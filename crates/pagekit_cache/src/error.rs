//! Cache error types.

use thiserror::Error;

/// Errors that can occur while storing templates.
#[derive(Debug, Error)]
pub enum CacheError {
    /// A structured payload did not carry markup in its second element.
    #[error("Invalid template payload for '{id}': {reason}")]
    InvalidPayload { id: String, reason: String },
}

impl CacheError {
    /// Creates an invalid payload error.
    pub fn invalid_payload(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPayload {
            id: id.into(),
            reason: reason.into(),
        }
    }
}
