//! Template store.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::debug;

use crate::scan::scan_declarations;
use crate::{CacheError, TemplateEntry, TemplatePayload};

/// In-memory template cache keyed by identifier.
///
/// Constructed by the application and shared (usually as an `Arc`) between
/// the page resolver and whatever feeds registrations into it. Entries are
/// never evicted; the last write for an identifier wins.
#[derive(Debug, Default)]
pub struct TemplateCache {
    storage: RwLock<HashMap<String, TemplateEntry>>,
}

impl TemplateCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the markup stored for `id`.
    ///
    /// A plain entry with empty markup reads as absent; a structured entry is
    /// always present, even when its markup is empty.
    pub fn get(&self, id: &str) -> Option<String> {
        self.storage
            .read()
            .get(id)
            .filter(|entry| !entry.markup.is_empty() || entry.metadata.is_some())
            .map(|entry| entry.markup.clone())
    }

    /// Returns the full entry stored for `id`.
    pub fn get_entry(&self, id: &str) -> Option<TemplateEntry> {
        self.storage.read().get(id).cloned()
    }

    /// Stores a template, replacing any previous entry for `id`.
    pub fn set(&self, id: impl Into<String>, entry: impl Into<TemplateEntry>) {
        let id = id.into();
        debug!("Registering template '{}'", id);
        self.storage.write().insert(id, entry.into());
    }

    /// Stores a template given in event payload form.
    pub fn set_payload(&self, id: &str, payload: TemplatePayload) -> Result<(), CacheError> {
        let entry = payload.into_entry(id)?;
        self.set(id, entry);
        Ok(())
    }

    /// Registers every template declaration embedded in `html`.
    ///
    /// Returns the number of declarations registered.
    pub fn register_declarations(&self, html: &str) -> usize {
        let declarations = scan_declarations(html);
        let count = declarations.len();

        let mut storage = self.storage.write();
        for declaration in declarations {
            storage.insert(declaration.id, TemplateEntry::new(declaration.content));
        }

        debug!("Registered {} embedded template declaration(s)", count);
        count
    }

    /// Returns whether an entry exists for `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.storage.read().contains_key(id)
    }

    /// Returns the registered identifiers, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.storage.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.storage.read().len()
    }

    /// Returns whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.storage.read().is_empty()
    }
}
