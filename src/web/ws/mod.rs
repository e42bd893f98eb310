//! WebSocket front end of the relay.
//!
//! Clients subscribe to `topic/<channel>` addresses and send messages to the
//! `chat.sendMessage` and `chat.addUser` commands over JSON text frames.

pub mod messages;
pub mod relay;

pub use messages::{ClientFrame, ServerFrame};
pub use relay::{relay_ws_handler, RelayWsState};
