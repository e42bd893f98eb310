//! chatrelay - real-time chat relay
//!
//! Clients connect over WebSocket, announce a display name and exchange short
//! messages scoped to named channels. The relay resolves each message's
//! channel, turns joins into announcements and fans messages out to the
//! channel's subscribers.

pub mod chat;
pub mod config;
pub mod error;
pub mod logging;
pub mod transport;
pub mod web;

pub use chat::{
    Command, ConnectionId, JoinNotifier, Message, MessageKind, MessageRouter, SessionStore,
    DEFAULT_CHANNEL,
};
pub use config::{Config, Topology};
pub use error::{RelayError, Result};
pub use transport::{Publisher, TopicHub};
pub use web::WebServer;
