//! Channel resolution.

/// Channel used when a message names none.
pub const DEFAULT_CHANNEL: &str = "public";

/// Resolve the effective channel for a message.
///
/// A present, non-empty name is returned as-is (no trimming, case kept).
/// Anything else resolves to [`DEFAULT_CHANNEL`].
pub fn resolve(raw: Option<&str>) -> String {
    match raw {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => DEFAULT_CHANNEL.to_string(),
    }
}
