//! Text normalization for extracted field values

/// Collapse every whitespace run into a single space and trim both ends.
///
/// Idempotent: `normalize_whitespace(&normalize_whitespace(s)) == normalize_whitespace(s)`.
#[must_use]
pub fn normalize_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize and drop the value when nothing is left.
#[must_use]
pub fn non_empty(raw: &str) -> Option<String> {
    let normalized = normalize_whitespace(raw);
    (!normalized.is_empty()).then_some(normalized)
}
