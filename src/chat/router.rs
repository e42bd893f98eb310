//! Message routing.
//!
//! The router resolves each message's channel, turns JOINs into "joined"
//! announcements and publishes the result once to the address the configured
//! topology selects.

use std::sync::Arc;

use super::channel;
use super::command::Command;
use super::message::{Message, MessageKind};
use super::notifier::JoinNotifier;
use super::session::{ConnectionId, SessionStore};
use crate::config::{RelayConfig, Topology};
use crate::transport::{topic_address, Publisher};
use crate::{RelayError, Result};

/// Routes inbound messages to their broadcast address.
pub struct MessageRouter {
    topology: Topology,
    fixed_address: String,
    sessions: Arc<SessionStore>,
    notifier: JoinNotifier,
    publisher: Arc<dyn Publisher>,
}

impl MessageRouter {
    /// Create a router publishing through `publisher`.
    pub fn new(
        config: &RelayConfig,
        sessions: Arc<SessionStore>,
        publisher: Arc<dyn Publisher>,
    ) -> Self {
        Self {
            topology: config.topology,
            fixed_address: config.fixed_address.clone(),
            notifier: JoinNotifier::new(Arc::clone(&sessions)),
            sessions,
            publisher,
        }
    }

    /// Get the session store.
    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// Get the delivery topology.
    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Address a message on `channel` is published to.
    pub fn address_for(&self, channel: &str) -> String {
        match self.topology {
            Topology::Dynamic => topic_address(channel),
            Topology::Fixed => self.fixed_address.clone(),
        }
    }

    /// Route one message received on `connection_id`.
    ///
    /// Returns the message as delivered, with its channel resolved.
    pub async fn route(
        &self,
        message: Option<Message>,
        connection_id: &ConnectionId,
    ) -> Result<Message> {
        let mut message = message
            .ok_or_else(|| RelayError::InvalidMessage("message is absent".to_string()))?;

        if message.sender.trim().is_empty() {
            return Err(RelayError::InvalidMessage(format!(
                "{} message has a blank sender",
                message.kind
            )));
        }

        let channel = channel::resolve(message.channel.as_deref());
        let address = self.address_for(&channel);
        message.channel = Some(channel);

        let outgoing = match message.kind {
            MessageKind::Join => self.notifier.on_join(&message, connection_id).await,
            MessageKind::Chat | MessageKind::Leave => message,
        };

        tracing::debug!(
            connection = %connection_id,
            kind = %outgoing.kind,
            address = %address,
            "Routing message"
        );
        self.publisher.publish(&address, outgoing.clone());

        Ok(outgoing)
    }

    /// Route a message sent to a named command destination.
    ///
    /// `chat.addUser` always produces a JOIN, whatever type the payload
    /// carried.
    pub async fn dispatch(
        &self,
        command: Command,
        message: Option<Message>,
        connection_id: &ConnectionId,
    ) -> Result<Message> {
        let message = match command {
            Command::SendMessage => message,
            Command::AddUser => message.map(|mut m| {
                m.kind = MessageKind::Join;
                m
            }),
        };
        self.route(message, connection_id).await
    }

    /// Forget the session of a closed connection.
    ///
    /// Nothing is published.
    pub async fn disconnect(&self, connection_id: &ConnectionId) -> Option<String> {
        let username = self.sessions.evict(connection_id).await;
        if let Some(ref name) = username {
            tracing::debug!(connection = %connection_id, username = %name, "Session evicted");
        }
        username
    }
}
