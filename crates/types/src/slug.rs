//! Stable identifier derivation for goal records.
//!
//! Goal targets are keyed by a slug of their specialty label rather than a
//! random id, so re-adding the same specialty after a removal produces the
//! same key and the durable goal files stay human-readable.

/// Derives a stable slug from a free-text label.
///
/// Lowercases the label and replaces every non-alphanumeric ASCII character
/// (and any non-ASCII character) with `-`. Consecutive separators are kept
/// as-is so the mapping stays a pure per-character substitution:
/// `"Oral & Maxillofacial Surgery"` → `"oral---maxillofacial-surgery"`.
pub fn slugify(label: &str) -> String {
    label
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}
