//! Input filters
//!
//! These filters normalize raw API input before validation

/// Trim surrounding whitespace
pub fn trim(value: &str) -> String {
    value.trim().to_string()
}

/// Treat an empty optional string as absent; other values pass through untouched
///
/// Whitespace is not empty: `"   "` stays present so the field rules can reject it.
pub fn empty_to_none(value: Option<&str>) -> Option<String> {
    value.filter(|s| !s.is_empty()).map(str::to_string)
}
