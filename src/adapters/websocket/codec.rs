//! JSON text-frame codec for the `/ws` protocol.
//!
//! ```text
//! client ─▶ {"type":"join","room":"employee:42"}
//! client ─▶ {"type":"private-message","to":"owner","message":{...}}
//! client ─▶ {"type":"ping"}
//! server ─▶ {"type":"connected","connectionId":"..."}
//! server ─▶ {"type":"message","from":"owner","text":"hi","ts":1700000000000}
//! server ─▶ {"type":"pong","ts":1700000000000}
//! ```

use thiserror::Error;

use crate::domain::messaging::{ClientFrame, ServerFrame};

/// Default upper bound for an inbound text frame.
pub const DEFAULT_MAX_FRAME_BYTES: usize = 16 * 1024;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Frame of {size} bytes exceeds limit of {max}")]
    FrameTooLarge { size: usize, max: usize },

    #[error("Malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Parses a frame sent by a client. Oversized frames are rejected before
/// any parsing happens.
pub fn decode_client_frame(text: &str, max_bytes: usize) -> Result<ClientFrame, CodecError> {
    if text.len() > max_bytes {
        return Err(CodecError::FrameTooLarge {
            size: text.len(),
            max: max_bytes,
        });
    }
    Ok(serde_json::from_str(text)?)
}

pub fn encode_server_frame(frame: &ServerFrame) -> Result<String, CodecError> {
    Ok(serde_json::to_string(frame)?)
}

pub fn encode_client_frame(frame: &ClientFrame) -> Result<String, CodecError> {
    Ok(serde_json::to_string(frame)?)
}

pub fn decode_server_frame(text: &str) -> Result<ServerFrame, CodecError> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::messaging::ChatMessage;

    #[test]
    fn decodes_join() {
        let frame = decode_client_frame(r#"{"type":"join","room":"employee:42"}"#, 1024).unwrap();
        assert_eq!(
            frame,
            ClientFrame::Join {
                room: "employee:42".to_string()
            }
        );
    }

    #[test]
    fn decodes_private_message() {
        let text = r#"{"type":"private-message","to":"owner","message":{"from":"Dana","text":"done","ts":5}}"#;

        match decode_client_frame(text, 1024).unwrap() {
            ClientFrame::PrivateMessage { to, message } => {
                assert_eq!(to, "owner");
                assert_eq!(message.text, "done");
            }
            other => panic!("unexpected frame {:?}", other),
        }
    }

    #[test]
    fn rejects_oversized_frame() {
        let text = format!(r#"{{"type":"join","room":"{}"}}"#, "x".repeat(100));

        let err = decode_client_frame(&text, 32).unwrap_err();

        assert!(matches!(err, CodecError::FrameTooLarge { max: 32, .. }));
    }

    #[test]
    fn rejects_unknown_type() {
        let err = decode_client_frame(r#"{"type":"subscribe","room":"owner"}"#, 1024).unwrap_err();
        assert!(matches!(err, CodecError::Malformed(_)));
    }

    #[test]
    fn rejects_non_json() {
        assert!(decode_client_frame("hello", 1024).is_err());
    }

    #[test]
    fn server_message_carries_only_payload_fields() {
        let frame = ServerFrame::Message(ChatMessage {
            from: "owner".to_string(),
            text: "hi".to_string(),
            ts: 1_700_000_000_000,
        });

        let json: serde_json::Value =
            serde_json::from_str(&encode_server_frame(&frame).unwrap()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"type": "message", "from": "owner", "text": "hi", "ts": 1_700_000_000_000u64})
        );
    }
}
