//! Per-connection session state.
//!
//! The store maps a connection handle to the display name the connection
//! claimed with its last JOIN. It is shared by every connection task.

use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

/// Opaque handle for one client connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Generate a fresh, unique connection ID.
    pub fn generate() -> Self {
        Self(format!("ws-{}", Uuid::new_v4()))
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ConnectionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ConnectionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Connection → username map.
#[derive(Debug, Default)]
pub struct SessionStore {
    usernames: RwLock<HashMap<ConnectionId, String>>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate a username with a connection, replacing any previous one.
    pub async fn bind(&self, connection_id: &ConnectionId, username: impl Into<String>) {
        self.usernames
            .write()
            .await
            .insert(connection_id.clone(), username.into());
    }

    /// Get the username bound to a connection, if any.
    pub async fn lookup(&self, connection_id: &ConnectionId) -> Option<String> {
        self.usernames.read().await.get(connection_id).cloned()
    }

    /// Remove a connection's entry, returning the username it held.
    pub async fn evict(&self, connection_id: &ConnectionId) -> Option<String> {
        self.usernames.write().await.remove(connection_id)
    }

    /// Number of bound connections.
    pub async fn len(&self) -> usize {
        self.usernames.read().await.len()
    }

    /// Check if no connection is bound.
    pub async fn is_empty(&self) -> bool {
        self.usernames.read().await.is_empty()
    }
}
