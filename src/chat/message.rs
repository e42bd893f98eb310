//! Chat message model.
//!
//! This is the shape clients put on the wire: `{"type", "sender", "content",
//! "channel"}` with the type written in upper case (`"CHAT"`, `"JOIN"`,
//! `"LEAVE"`).

use serde::{Deserialize, Deserializer, Serialize};

/// Type of chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MessageKind {
    /// User-authored text.
    Chat,
    /// User announced presence.
    Join,
    /// User left.
    Leave,
}

impl MessageKind {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Chat => "CHAT",
            MessageKind::Join => "JOIN",
            MessageKind::Leave => "LEAVE",
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message type.
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// Display name supplied by the client.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sender: String,
    /// Message text.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
    /// Destination channel. `None` or empty means the default channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Message {
    /// Create a chat message with no channel.
    pub fn chat(sender: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Chat,
            sender: sender.into(),
            content: content.into(),
            channel: None,
        }
    }

    /// Create a join announcement with no content and no channel.
    pub fn join(sender: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Join,
            sender: sender.into(),
            content: String::new(),
            channel: None,
        }
    }

    /// Set the channel.
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }
}
