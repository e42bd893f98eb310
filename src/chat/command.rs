//! Inbound command destinations.
//!
//! Clients send messages to one of two named entry points:
//! `chat.sendMessage` for chat text and `chat.addUser` to announce a name.
//! The `/app/` prefix used by browser STOMP clients is accepted and ignored.

use crate::{RelayError, Result};

/// Prefix some clients put in front of application destinations.
const APP_PREFIX: &str = "/app/";

/// A client-invoked action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `chat.sendMessage`: relay the payload as sent.
    SendMessage,
    /// `chat.addUser`: treat the payload as a JOIN.
    AddUser,
}

impl Command {
    /// Get the destination name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::SendMessage => "chat.sendMessage",
            Command::AddUser => "chat.addUser",
        }
    }

    /// Parse a send destination into a command.
    pub fn from_destination(destination: &str) -> Result<Self> {
        let name = destination.strip_prefix(APP_PREFIX).unwrap_or(destination);
        match name {
            "chat.sendMessage" => Ok(Command::SendMessage),
            "chat.addUser" => Ok(Command::AddUser),
            _ => Err(RelayError::InvalidMessage(format!(
                "unknown destination: {destination}"
            ))),
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
