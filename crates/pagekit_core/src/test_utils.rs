use std::collections::HashMap;

use parking_lot::Mutex;
use reqwest::Url;

use crate::http_client::{Transport, TransportError, TransportResponse};

/// In-memory transport that records every requested URL.
///
/// URLs without a canned response answer `404 Not Found`.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: HashMap<String, TransportResponse>,
    calls: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, url: &str, response: TransportResponse) -> Self {
        self.responses.insert(url.to_string(), response);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

impl Transport for MockTransport {
    async fn get(&self, url: &Url) -> Result<TransportResponse, TransportError> {
        self.calls.lock().push(url.to_string());
        Ok(self
            .responses
            .get(url.as_str())
            .cloned()
            .unwrap_or_else(|| TransportResponse::new(404, "Not Found")))
    }
}
