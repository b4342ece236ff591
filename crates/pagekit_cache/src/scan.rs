//! Scanner for template declarations embedded in a document.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

/// Script types that declare an embedded template, in registration order.
pub const DECLARATION_TYPES: [&str; 3] = ["text/ons-template", "text/template", "text/ng-template"];

static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b([^>]*)>(.*?)</script\s*>").expect("valid script pattern")
});

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)([a-z_:][-a-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#)
        .expect("valid attribute pattern")
});

/// A template declared inline in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDeclaration {
    /// Declared identifier (`id` attribute).
    pub id: String,
    /// Text content of the declaration.
    pub content: String,
    /// Script type the template was declared with.
    pub kind: &'static str,
}

/// Finds the template declarations embedded in `html`.
///
/// Declarations are grouped by script type in [`DECLARATION_TYPES`] order and
/// kept in document order within each group, so that registering them in the
/// returned order lets a later duplicate override an earlier one.
pub fn scan_declarations(html: &str) -> Vec<TemplateDeclaration> {
    let scripts: Vec<(Option<&'static str>, Option<String>, &str)> = SCRIPT_RE
        .captures_iter(html)
        .map(|caps| {
            let attrs = caps.get(1).map_or("", |m| m.as_str());
            let body = caps.get(2).map_or("", |m| m.as_str());
            let kind = attribute(attrs, "type").and_then(|ty| {
                DECLARATION_TYPES
                    .iter()
                    .copied()
                    .find(|known| known.eq_ignore_ascii_case(ty.trim()))
            });
            (kind, attribute(attrs, "id"), body)
        })
        .collect();

    let mut declarations = Vec::new();
    for kind in DECLARATION_TYPES {
        for (script_kind, id, body) in &scripts {
            if *script_kind != Some(kind) {
                continue;
            }
            match id.as_deref() {
                Some(id) if !id.is_empty() => declarations.push(TemplateDeclaration {
                    id: id.to_string(),
                    content: body.to_string(),
                    kind,
                }),
                _ => debug!("Skipping {} declaration without an id", kind),
            }
        }
    }

    declarations
}

fn attribute(attrs: &str, name: &str) -> Option<String> {
    ATTR_RE.captures_iter(attrs).find_map(|caps| {
        let key = caps.get(1)?.as_str();
        if !key.eq_ignore_ascii_case(name) {
            return None;
        }
        caps.get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|m| m.as_str().to_string())
    })
}
