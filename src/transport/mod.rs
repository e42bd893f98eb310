//! Transport side of the relay: the publish seam and the in-process hub.
//!
//! The WebSocket front end lives in [`crate::web::ws`].

mod hub;
mod publisher;

pub use hub::TopicHub;
pub use publisher::{normalize_address, topic_address, Publisher, TOPIC_PREFIX};
