//! Reactive template registration.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::{CacheError, TemplateCache, TemplatePayload};

/// Element name whose load notifications register templates.
pub const TEMPLATE_ELEMENT: &str = "ons-template";

/// Notification that a template element has finished loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateLoaded {
    /// Name of the element that emitted the notification.
    #[serde(default = "default_target")]
    pub target: String,
    /// Identifier to register the template under.
    pub template_id: String,
    /// Template payload.
    pub template: TemplatePayload,
}

fn default_target() -> String {
    TEMPLATE_ELEMENT.to_string()
}

impl TemplateLoaded {
    /// Creates a notification emitted by a template element.
    pub fn new(template_id: impl Into<String>, template: impl Into<TemplatePayload>) -> Self {
        Self {
            target: TEMPLATE_ELEMENT.to_string(),
            template_id: template_id.into(),
            template: template.into(),
        }
    }
}

impl TemplateCache {
    /// Handles a template registration notification.
    ///
    /// Returns `Ok(false)` when the notification did not come from a template
    /// element and was ignored.
    pub fn on_template_loaded(&self, event: TemplateLoaded) -> Result<bool, CacheError> {
        if !event.target.eq_ignore_ascii_case(TEMPLATE_ELEMENT) {
            debug!(
                "Ignoring template notification from <{}> for '{}'",
                event.target, event.template_id
            );
            return Ok(false);
        }

        self.set_payload(&event.template_id, event.template)?;
        Ok(true)
    }
}

/// Spawns the registration listener.
///
/// Every notification received on `events` is applied to `cache` until all
/// senders are dropped. Invalid payloads are logged and skipped.
pub fn spawn_listener(
    cache: Arc<TemplateCache>,
    mut events: UnboundedReceiver<TemplateLoaded>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            if let Err(e) = cache.on_template_loaded(event) {
                warn!("Dropping template registration: {}", e);
            }
        }
        debug!("Template registration channel closed");
    })
}
