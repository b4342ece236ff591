//! Page template resolution.
//!
//! Turns a page reference into normalized page markup: the reference is
//! expanded into candidate identifiers, each candidate is looked up in the
//! [`TemplateCache`] and then fetched over the network, and the first
//! successful candidate is wrapped into a page container.

pub mod config;
pub mod error;
pub mod expression;
pub mod fetcher;
pub mod http_client;
pub mod normalize;
pub mod resolver;

#[cfg(test)]
mod test_utils;

pub use config::{ConfigError, PagekitConfig, TransportFaultPolicy};
pub use error::FetchError;
pub use expression::{CandidateEvaluator, ExpressionError, PageAttributeExpression};
pub use fetcher::TemplateFetcher;
pub use http_client::{HttpTransport, Transport, TransportError, TransportResponse};
pub use normalize::{PAGE_OPEN_TAG, normalize_page_html};
pub use pagekit_cache::{TemplateCache, TemplateEntry, TemplateLoaded, TemplatePayload};
pub use resolver::{PageResolver, ResolveError};
