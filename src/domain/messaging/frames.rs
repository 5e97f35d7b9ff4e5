//! Wire protocol frames exchanged between clients and the gateway.
//!
//! Frames are tagged by a `type` field:
//!
//! ```text
//! client → gateway   {"type":"join","room":"employee:42"}
//!                    {"type":"private-message","to":"employee:42","message":{...}}
//!                    {"type":"ping"}
//! gateway → client   {"type":"connected","connectionId":"<uuid>"}
//!                    {"type":"message","from":"owner","text":"hi","ts":1700000000000}
//!                    {"type":"pong","ts":1700000000000}
//! ```
//!
//! Room descriptors arrive as raw strings; the gateway validates them.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ConnectionId;

use super::message::ChatMessage;

/// Requests a client may send to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientFrame {
    /// Join a room to start receiving its messages.
    Join { room: String },

    /// Route a message to a room.
    PrivateMessage { to: String, message: ChatMessage },

    /// Heartbeat request.
    Ping,
}

/// Frames the gateway pushes to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerFrame {
    /// Sent once, right after the connection is accepted.
    Connected {
        #[serde(rename = "connectionId")]
        connection_id: ConnectionId,
    },

    /// A message routed to a room this connection joined.
    Message(ChatMessage),

    /// Heartbeat response.
    Pong { ts: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_deserializes() {
        let frame: ClientFrame =
            serde_json::from_str(r#"{"type":"join","room":"employee:42"}"#).unwrap();
        assert_eq!(
            frame,
            ClientFrame::Join {
                room: "employee:42".to_string()
            }
        );
    }

    #[test]
    fn private_message_deserializes() {
        let json = r#"{"type":"private-message","to":"employee:42","message":{"from":"owner","text":"hi","ts":5}}"#;
        let frame: ClientFrame = serde_json::from_str(json).unwrap();
        match frame {
            ClientFrame::PrivateMessage { to, message } => {
                assert_eq!(to, "employee:42");
                assert_eq!(message.text, "hi");
                assert_eq!(message.ts, 5);
            }
            other => panic!("unexpected frame {:?}", other),
        }
    }

    #[test]
    fn private_message_without_text_is_rejected() {
        let json = r#"{"type":"private-message","to":"owner","message":{"from":"Dana","ts":5}}"#;
        assert!(serde_json::from_str::<ClientFrame>(json).is_err());
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(serde_json::from_str::<ClientFrame>(r#"{"type":"broadcast"}"#).is_err());
    }

    #[test]
    fn message_frame_carries_only_payload_fields() {
        let frame = ServerFrame::Message(ChatMessage {
            from: "owner".to_string(),
            text: "hi".to_string(),
            ts: 7,
        });
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "message", "from": "owner", "text": "hi", "ts": 7})
        );
    }

    #[test]
    fn connected_frame_uses_camel_case_id() {
        let id = ConnectionId::new();
        let json = serde_json::to_string(&ServerFrame::Connected { connection_id: id }).unwrap();
        assert!(json.contains(r#""type":"connected""#));
        assert!(json.contains(&format!(r#""connectionId":"{}""#, id)));
    }
}
