//! Item name normalization shared by every duplicate check

/// Comparison key for an item name: trimmed and lowercased.
///
/// Ordinal comparison of the lowercased form is enough here; full Unicode
/// case folding is not required.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// True when the name has no visible characters
pub fn is_blank(name: &str) -> bool {
    name.trim().is_empty()
}
