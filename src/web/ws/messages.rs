//! WebSocket frame types for the relay protocol.

use serde::{Deserialize, Serialize};

use crate::chat::Message;

/// Frames sent from client to server.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClientFrame {
    /// Start receiving messages published to an address.
    Subscribe {
        /// Address such as `topic/public`.
        destination: String,
    },
    /// Stop receiving messages from an address.
    Unsubscribe {
        /// Address previously subscribed to.
        destination: String,
    },
    /// Invoke a command with a message payload.
    Send {
        /// Command destination (`chat.sendMessage` or `chat.addUser`).
        destination: String,
        /// Message body. Absent or `null` is rejected by the router.
        #[serde(default)]
        payload: Option<serde_json::Value>,
    },
    /// Heartbeat ping.
    Ping,
}

/// Frames sent from server to client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "frame", rename_all = "snake_case")]
pub enum ServerFrame {
    /// A message published to a subscribed address.
    Message {
        /// Address the message was published to.
        destination: String,
        /// The routed message.
        payload: Message,
    },
    /// Heartbeat pong response.
    Pong,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribe_deserialize() {
        let json = r#"{"action": "subscribe", "destination": "/topic/public"}"#;
        match serde_json::from_str::<ClientFrame>(json).unwrap() {
            ClientFrame::Subscribe { destination } => assert_eq!(destination, "/topic/public"),
            _ => panic!("Expected Subscribe frame"),
        }
    }

    #[test]
    fn test_unsubscribe_deserialize() {
        let json = r#"{"action": "unsubscribe", "destination": "topic/rust"}"#;
        assert!(matches!(
            serde_json::from_str::<ClientFrame>(json).unwrap(),
            ClientFrame::Unsubscribe { .. }
        ));
    }

    #[test]
    fn test_send_deserialize() {
        let json = r#"{
            "action": "send",
            "destination": "/app/chat.addUser",
            "payload": {"sender": "alice", "type": "JOIN"}
        }"#;
        match serde_json::from_str::<ClientFrame>(json).unwrap() {
            ClientFrame::Send {
                destination,
                payload,
            } => {
                assert_eq!(destination, "/app/chat.addUser");
                assert_eq!(payload.unwrap()["sender"], "alice");
            }
            _ => panic!("Expected Send frame"),
        }
    }

    #[test]
    fn test_send_null_payload() {
        let json = r#"{"action": "send", "destination": "chat.sendMessage", "payload": null}"#;
        match serde_json::from_str::<ClientFrame>(json).unwrap() {
            ClientFrame::Send { payload, .. } => assert!(payload.is_none()),
            _ => panic!("Expected Send frame"),
        }
    }

    #[test]
    fn test_ping_deserialize() {
        let json = r#"{"action": "ping"}"#;
        assert!(matches!(
            serde_json::from_str::<ClientFrame>(json).unwrap(),
            ClientFrame::Ping
        ));
    }

    #[test]
    fn test_unknown_action_fails() {
        let json = r#"{"action": "shout"}"#;
        assert!(serde_json::from_str::<ClientFrame>(json).is_err());
    }

    #[test]
    fn test_message_frame_serialize() {
        let frame = ServerFrame::Message {
            destination: "topic/public".to_string(),
            payload: Message::chat("alice", "hi").with_channel("public"),
        };
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["frame"], "message");
        assert_eq!(json["destination"], "topic/public");
        assert_eq!(json["payload"]["type"], "CHAT");
        assert_eq!(json["payload"]["channel"], "public");
    }

    #[test]
    fn test_pong_serialize() {
        let json = serde_json::to_string(&ServerFrame::Pong).unwrap();
        assert_eq!(json, r#"{"frame":"pong"}"#);
    }
}
