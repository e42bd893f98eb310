//! Relay WebSocket handler.
//!
//! Each socket gets its own task. Inbound frames are handled one at a time in
//! arrival order; subscriptions are forwarded into a per-connection outbox by
//! one small task per address.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message as WsMessage, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::chat::{Command, ConnectionId, Message, MessageRouter, SessionStore};
use crate::config::RelayConfig;
use crate::transport::{normalize_address, Publisher, TopicHub};
use crate::Result;

use super::messages::{ClientFrame, ServerFrame};

/// Frames queued per connection before forwarders wait on the socket.
const OUTBOX_CAPACITY: usize = 64;

/// State for the relay WebSocket handler.
#[derive(Clone)]
pub struct RelayWsState {
    /// Message router.
    pub router: Arc<MessageRouter>,
    /// Hub the router publishes into and sockets subscribe to.
    pub hub: Arc<TopicHub>,
}

impl RelayWsState {
    /// Create a state from existing parts.
    pub fn new(router: Arc<MessageRouter>, hub: Arc<TopicHub>) -> Self {
        Self { router, hub }
    }

    /// Build a hub, a session store and a router wired to each other.
    pub fn from_config(config: &RelayConfig) -> Self {
        let hub = Arc::new(TopicHub::new(config.channel_capacity));
        let router = MessageRouter::new(
            config,
            Arc::new(SessionStore::new()),
            Arc::clone(&hub) as Arc<dyn Publisher>,
        );
        Self::new(Arc::new(router), hub)
    }
}

/// WebSocket relay handler.
///
/// GET /ws
pub async fn relay_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<RelayWsState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// One client connection's subscriptions and outbox.
struct Connection {
    id: ConnectionId,
    outbox: mpsc::Sender<ServerFrame>,
    subscriptions: HashMap<String, JoinHandle<()>>,
}

impl Connection {
    fn new(id: ConnectionId, outbox: mpsc::Sender<ServerFrame>) -> Self {
        Self {
            id,
            outbox,
            subscriptions: HashMap::new(),
        }
    }

    fn subscribe(&mut self, hub: &Arc<TopicHub>, destination: &str) {
        let address = normalize_address(destination);
        if self.subscriptions.contains_key(address) {
            return;
        }

        let subscription = Subscription::new(Arc::clone(hub), address);
        let handle = spawn_forwarder(subscription, self.outbox.clone(), self.id.clone());
        self.subscriptions.insert(address.to_string(), handle);
        tracing::debug!(
            connection = %self.id,
            address,
            subscribers = hub.subscriber_count(address),
            "Subscribed"
        );
    }

    /// Stop forwarding `destination`. Returns once the hub slot is released.
    async fn unsubscribe(&mut self, destination: &str) {
        let address = normalize_address(destination);
        if let Some(handle) = self.subscriptions.remove(address) {
            stop_forwarder(handle).await;
            tracing::debug!(connection = %self.id, address, "Unsubscribed");
        }
    }

    /// Stop every forwarder and wait for their slots to be released.
    async fn close(&mut self) {
        for (_, handle) in self.subscriptions.drain() {
            stop_forwarder(handle).await;
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        for (_, handle) in self.subscriptions.drain() {
            handle.abort();
        }
    }
}

async fn stop_forwarder(handle: JoinHandle<()>) {
    handle.abort();
    // Resolves after the task's future, and with it the Subscription, is dropped.
    let _ = handle.await;
}

/// A hub receiver that gives its address back to the hub when dropped.
struct Subscription {
    hub: Arc<TopicHub>,
    address: String,
    receiver: Option<broadcast::Receiver<Message>>,
}

impl Subscription {
    fn new(hub: Arc<TopicHub>, address: &str) -> Self {
        let receiver = hub.subscribe(address);
        Self {
            hub,
            address: address.to_string(),
            receiver: Some(receiver),
        }
    }

    async fn recv(&mut self) -> std::result::Result<Message, broadcast::error::RecvError> {
        match self.receiver.as_mut() {
            Some(receiver) => receiver.recv().await,
            None => Err(broadcast::error::RecvError::Closed),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        // The receiver must be gone before the hub checks the count.
        drop(self.receiver.take());
        self.hub.release(&self.address);
    }
}

/// Forward everything published on the subscription's address into the
/// connection's outbox.
fn spawn_forwarder(
    mut subscription: Subscription,
    outbox: mpsc::Sender<ServerFrame>,
    connection_id: ConnectionId,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match subscription.recv().await {
                Ok(payload) => {
                    let frame = ServerFrame::Message {
                        destination: subscription.address.clone(),
                        payload,
                    };
                    if outbox.send(frame).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(
                        connection = %connection_id,
                        address = %subscription.address,
                        skipped,
                        "Subscriber lagged; messages skipped"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

/// Handle a WebSocket connection.
async fn handle_socket(socket: WebSocket, state: Arc<RelayWsState>) {
    let (outbox_tx, mut outbox_rx) = mpsc::channel(OUTBOX_CAPACITY);
    let mut connection = Connection::new(ConnectionId::generate(), outbox_tx);

    tracing::debug!("WebSocket session started: {}", connection.id);

    let (mut ws_sender, mut ws_receiver) = socket.split();

    loop {
        tokio::select! {
            incoming = ws_receiver.next() => {
                let Some(incoming) = incoming else {
                    break;
                };
                match incoming {
                    Ok(WsMessage::Text(text)) => {
                        let reply = match serde_json::from_str::<ClientFrame>(&text) {
                            Ok(frame) => handle_client_frame(&state, &mut connection, frame).await,
                            Err(e) => {
                                tracing::warn!(connection = %connection.id, "Malformed frame: {}", e);
                                None
                            }
                        };
                        if let Some(reply) = reply {
                            if send_frame(&mut ws_sender, &reply).await.is_err() {
                                break;
                            }
                        }
                    }
                    Ok(WsMessage::Close(_)) => {
                        tracing::debug!("WebSocket closed by client: {}", connection.id);
                        break;
                    }
                    Ok(WsMessage::Ping(data)) => {
                        if ws_sender.send(WsMessage::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::debug!("WebSocket error on {}: {}", connection.id, e);
                        break;
                    }
                }
            }

            Some(frame) = outbox_rx.recv() => {
                if send_frame(&mut ws_sender, &frame).await.is_err() {
                    break;
                }
            }
        }
    }

    connection.close().await;
    state.router.disconnect(&connection.id).await;
    tracing::debug!(
        topics = state.hub.topic_count(),
        "WebSocket session ended: {}",
        connection.id
    );
}

/// Serialize and write one frame.
async fn send_frame(
    ws_sender: &mut futures::stream::SplitSink<WebSocket, WsMessage>,
    frame: &ServerFrame,
) -> std::result::Result<(), axum::Error> {
    match serde_json::to_string(frame) {
        Ok(json) => ws_sender.send(WsMessage::Text(json)).await,
        Err(e) => {
            tracing::error!("Failed to serialize frame: {}", e);
            Ok(())
        }
    }
}

/// Handle a client frame, returning a direct reply if there is one.
async fn handle_client_frame(
    state: &RelayWsState,
    connection: &mut Connection,
    frame: ClientFrame,
) -> Option<ServerFrame> {
    match frame {
        ClientFrame::Subscribe { destination } => {
            connection.subscribe(&state.hub, &destination);
            None
        }

        ClientFrame::Unsubscribe { destination } => {
            connection.unsubscribe(&destination).await;
            None
        }

        ClientFrame::Send {
            destination,
            payload,
        } => {
            if let Err(e) = relay_send(state, &connection.id, &destination, payload).await {
                tracing::warn!(
                    connection = %connection.id,
                    destination = %destination,
                    "Message rejected: {}",
                    e
                );
            }
            None
        }

        ClientFrame::Ping => Some(ServerFrame::Pong),
    }
}

/// Decode a send frame and hand it to the router.
async fn relay_send(
    state: &RelayWsState,
    connection_id: &ConnectionId,
    destination: &str,
    payload: Option<serde_json::Value>,
) -> Result<Message> {
    let command = Command::from_destination(destination)?;
    let message = payload
        .map(serde_json::from_value::<Message>)
        .transpose()?;
    state.router.dispatch(command, message, connection_id).await
}
