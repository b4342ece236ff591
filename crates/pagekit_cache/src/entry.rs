//! Cache entry types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::CacheError;

/// A cached page template.
///
/// Every source of templates is reduced to this one shape when it is written,
/// so readers only ever deal with a markup string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateEntry {
    /// Raw template markup.
    pub markup: String,

    /// Extra data carried by structured payloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl TemplateEntry {
    /// Creates an entry holding only markup.
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
            metadata: None,
        }
    }

    /// Attaches metadata to the entry.
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

impl From<String> for TemplateEntry {
    fn from(markup: String) -> Self {
        Self::new(markup)
    }
}

impl From<&str> for TemplateEntry {
    fn from(markup: &str) -> Self {
        Self::new(markup)
    }
}

/// Template payload as carried by a registration event.
///
/// Either plain markup, or a positional record whose second element is the
/// markup (e.g. `[status, "<ons-page>..</ons-page>", headers]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TemplatePayload {
    /// Plain markup string.
    Markup(String),
    /// Positional record with the markup at index 1.
    Structured(Vec<Value>),
}

impl TemplatePayload {
    /// Converts the payload into a cache entry for `id`.
    ///
    /// Elements of a structured payload other than the markup are kept as
    /// metadata, with the markup slot set to `null`.
    pub fn into_entry(self, id: &str) -> Result<TemplateEntry, CacheError> {
        match self {
            TemplatePayload::Markup(markup) => Ok(TemplateEntry::new(markup)),
            TemplatePayload::Structured(mut items) => {
                let markup = match items.get_mut(1) {
                    Some(Value::String(s)) => std::mem::take(s),
                    Some(other) => {
                        return Err(CacheError::invalid_payload(
                            id,
                            format!("expected markup string at index 1, found {other}"),
                        ));
                    }
                    None => {
                        return Err(CacheError::invalid_payload(
                            id,
                            format!("structured payload has {} element(s)", items.len()),
                        ));
                    }
                };
                items[1] = Value::Null;

                Ok(TemplateEntry::new(markup).with_metadata(Value::Array(items)))
            }
        }
    }
}

impl From<String> for TemplatePayload {
    fn from(markup: String) -> Self {
        Self::Markup(markup)
    }
}

impl From<&str> for TemplatePayload {
    fn from(markup: &str) -> Self {
        Self::Markup(markup.to_string())
    }
}
