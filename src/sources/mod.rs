//! Source adapters: pure mappings from origin-specific records into
//! [`UnifiedEvent`](crate::timeline::event::UnifiedEvent)s.
//!
//! Adapters only do field mapping, id namespacing (`<source>-<native id>`),
//! description truncation, and URL fallback construction. They never talk to
//! each other, and only the calendar-feed adapter marks events recurring.

pub mod ai;
pub mod ics;
pub mod proposal;

/// Cap free text at `limit` characters, appending `...`. Cuts at character
/// boundaries, never inside a multi-byte sequence. Empty input maps to
/// `None`.
pub(crate) fn truncate_description(text: &str, limit: usize) -> Option<String> {
    if text.is_empty() {
        return None;
    }
    if text.chars().count() <= limit {
        return Some(text.to_string());
    }
    let mut truncated: String = text.chars().take(limit).collect();
    truncated.push_str("...");
    Some(truncated)
}
