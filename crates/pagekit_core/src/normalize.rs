//! Page markup normalization.

/// Opening of the page container element.
pub const PAGE_OPEN_TAG: &str = "<ons-page";

/// Wraps markup into a single page container unless it already is one.
///
/// The markup is trimmed first, byte order marks included. Normalizing
/// already-normalized markup returns it unchanged.
pub fn normalize_page_html(html: &str) -> String {
    let html = html.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}');

    if html.starts_with(PAGE_OPEN_TAG) {
        html.to_string()
    } else {
        format!("{PAGE_OPEN_TAG} _muted>{html}</ons-page>")
    }
}
