//! Template cache for pagekit.
//!
//! Holds page templates keyed by identifier. The cache is filled once from
//! the template declarations embedded in a document and then, for the
//! lifetime of the process, from template registration events.

mod entry;
mod error;
mod events;
mod scan;
mod store;

pub use entry::{TemplateEntry, TemplatePayload};
pub use error::CacheError;
pub use events::{TEMPLATE_ELEMENT, TemplateLoaded, spawn_listener};
pub use scan::{DECLARATION_TYPES, TemplateDeclaration, scan_declarations};
pub use store::TemplateCache;
