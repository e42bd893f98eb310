//! Join announcements.

use std::sync::Arc;

use super::message::{Message, MessageKind};
use super::session::{ConnectionId, SessionStore};

/// Build the system text announcing that `sender` joined.
fn join_text(sender: &str) -> String {
    format!("{sender} joined!")
}

/// Records the claimed username and synthesizes the "joined" event.
pub struct JoinNotifier {
    sessions: Arc<SessionStore>,
}

impl JoinNotifier {
    /// Create a notifier writing to the given session store.
    pub fn new(sessions: Arc<SessionStore>) -> Self {
        Self { sessions }
    }

    /// Handle a JOIN whose channel is already resolved.
    ///
    /// Binds the sender to the connection and returns a fresh JOIN message
    /// carrying the announcement text. The caller guarantees a non-empty
    /// sender.
    pub async fn on_join(&self, message: &Message, connection_id: &ConnectionId) -> Message {
        debug_assert_eq!(message.kind, MessageKind::Join);

        self.sessions.bind(connection_id, &message.sender).await;

        Message {
            kind: MessageKind::Join,
            sender: message.sender.clone(),
            content: join_text(&message.sender),
            channel: message.channel.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_text() {
        assert_eq!(join_text("alice"), "alice joined!");
    }

    #[tokio::test]
    async fn test_on_join_binds_and_synthesizes() {
        let sessions = Arc::new(SessionStore::new());
        let notifier = JoinNotifier::new(Arc::clone(&sessions));
        let conn = ConnectionId::from("a");

        let incoming = Message::join("alice").with_channel("rust");
        let out = notifier.on_join(&incoming, &conn).await;

        assert_eq!(out.kind, MessageKind::Join);
        assert_eq!(out.sender, "alice");
        assert_eq!(out.content, "alice joined!");
        assert_eq!(out.channel.as_deref(), Some("rust"));
        assert_eq!(sessions.lookup(&conn).await.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn test_on_join_replaces_client_content() {
        let sessions = Arc::new(SessionStore::new());
        let notifier = JoinNotifier::new(sessions);

        let mut incoming = Message::join("bob").with_channel("public");
        incoming.content = "ignore me".to_string();
        let out = notifier.on_join(&incoming, &ConnectionId::from("b")).await;

        assert_eq!(out.content, "bob joined!");
    }

    #[tokio::test]
    async fn test_rejoin_with_new_name() {
        let sessions = Arc::new(SessionStore::new());
        let notifier = JoinNotifier::new(Arc::clone(&sessions));
        let conn = ConnectionId::from("a");

        notifier
            .on_join(&Message::join("alice").with_channel("public"), &conn)
            .await;
        notifier
            .on_join(&Message::join("alicia").with_channel("public"), &conn)
            .await;

        assert_eq!(sessions.lookup(&conn).await.as_deref(), Some("alicia"));
    }
}
