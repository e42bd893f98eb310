//! Publish capability and address conventions.

use crate::chat::Message;

/// Prefix of every channel address.
pub const TOPIC_PREFIX: &str = "topic/";

/// Build the address for a resolved channel.
pub fn topic_address(channel: &str) -> String {
    format!("{TOPIC_PREFIX}{channel}")
}

/// Strip the leading `/` some clients put on addresses.
///
/// `/topic/public` and `topic/public` name the same address.
pub fn normalize_address(raw: &str) -> &str {
    raw.strip_prefix('/').unwrap_or(raw)
}

/// Hands a message to every subscriber of an address.
///
/// Delivery is fire-and-forget: no acknowledgment, no retry. Failures are
/// the implementation's to log.
pub trait Publisher: Send + Sync {
    /// Publish a message to an address.
    fn publish(&self, address: &str, message: Message);
}
