//! Chat core for chatrelay.
//!
//! This module provides the routing and session logic:
//! - Message model (chat, join, leave)
//! - Channel resolution with the `public` default
//! - Per-connection session store
//! - Join announcements
//! - The message router and its command entry points

pub mod channel;
mod command;
mod message;
mod notifier;
mod router;
mod session;

pub use channel::{resolve, DEFAULT_CHANNEL};
pub use command::Command;
pub use message::{Message, MessageKind};
pub use notifier::JoinNotifier;
pub use router::MessageRouter;
pub use session::{ConnectionId, SessionStore};
