//! In-process publish/subscribe hub.
//!
//! Each address gets a tokio broadcast channel on first subscribe and loses
//! it again once the last receiver is released. Publishing to an address
//! nobody listens on drops the message.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use tokio::sync::broadcast;

use super::publisher::Publisher;
use crate::chat::Message;

/// Address → broadcast sender registry.
pub struct TopicHub {
    capacity: usize,
    topics: RwLock<HashMap<String, broadcast::Sender<Message>>>,
}

impl TopicHub {
    /// Create a hub buffering `capacity` messages per address.
    ///
    /// A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            topics: RwLock::new(HashMap::new()),
        }
    }

    /// Get a receiver for messages published to `address`.
    pub fn subscribe(&self, address: &str) -> broadcast::Receiver<Message> {
        if let Some(sender) = self
            .topics
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(address)
        {
            return sender.subscribe();
        }

        let mut topics = self.topics.write().unwrap_or_else(PoisonError::into_inner);
        topics
            .entry(address.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Send a message to every current subscriber of `address`.
    ///
    /// Returns the number of receivers the message was queued for.
    pub fn send(&self, address: &str, message: Message) -> usize {
        let result = {
            let topics = self.topics.read().unwrap_or_else(PoisonError::into_inner);
            match topics.get(address) {
                Some(sender) => sender.send(message),
                None => {
                    tracing::debug!(address, "No subscribers; message dropped");
                    return 0;
                }
            }
        };

        match result {
            Ok(count) => count,
            Err(_) => {
                tracing::debug!(address, "All subscribers gone; message dropped");
                self.release(address);
                0
            }
        }
    }

    /// Number of live receivers on `address`.
    pub fn subscriber_count(&self, address: &str) -> usize {
        self.topics
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(address)
            .map_or(0, broadcast::Sender::receiver_count)
    }

    /// Number of addresses currently allocated.
    pub fn topic_count(&self) -> usize {
        self.topics
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Free the slot for `address` if no receiver is left on it.
    ///
    /// Call after dropping a receiver. Returns whether the slot was removed.
    pub fn release(&self, address: &str) -> bool {
        let mut topics = self.topics.write().unwrap_or_else(PoisonError::into_inner);
        // Someone may have subscribed again since the receiver was dropped.
        if topics
            .get(address)
            .is_some_and(|sender| sender.receiver_count() == 0)
        {
            topics.remove(address);
            tracing::trace!(address, remaining = topics.len(), "Address released");
            true
        } else {
            false
        }
    }
}

impl Publisher for TopicHub {
    fn publish(&self, address: &str, message: Message) {
        let delivered = self.send(address, message);
        tracing::trace!(address, delivered, "Published");
    }
}
