//! JSON wire frames for the streaming channel.
//!
//! Inbound frames are tagged with an `event` discriminator; unknown or
//! malformed frames are dropped individually by the transport layer without
//! affecting the connection.

use serde::{Deserialize, Serialize};

use crate::message::ChatMessage;

/// Frames received from the server over the streaming channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum ServerFrame {
    /// A new chat message broadcast to the room.
    Message {
        /// The message entity.
        message: ChatMessage,
    },
    /// A participant joined the room.
    Join {
        /// Subject participant.
        username: String,
    },
    /// A participant left the room.
    Leave {
        /// Subject participant.
        username: String,
    },
}

/// Frames sent by the client over the streaming channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum ClientFrame {
    /// An outbound chat message.
    Message {
        /// Message body.
        content: String,
        /// Author, the local user.
        sender: String,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::message::MessageId;

    #[test]
    fn parses_message_frame() {
        let json = r#"{"event":"message","message":{
            "id":1,"username":"bob","content":"hello",
            "created_at":"2024-03-01T09:00:00Z"}}"#;
        let frame: ServerFrame = serde_json::from_str(json).unwrap();
        match frame {
            ServerFrame::Message { message } => {
                assert_eq!(message.id, MessageId(1));
                assert_eq!(message.content, "hello");
            },
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn parses_presence_frames() {
        let join: ServerFrame = serde_json::from_str(r#"{"event":"join","username":"bob"}"#).unwrap();
        assert_eq!(join, ServerFrame::Join { username: "bob".into() });

        let leave: ServerFrame =
            serde_json::from_str(r#"{"event":"leave","username":"bob"}"#).unwrap();
        assert_eq!(leave, ServerFrame::Leave { username: "bob".into() });
    }

    #[test]
    fn rejects_unknown_discriminator() {
        let result = serde_json::from_str::<ServerFrame>(r#"{"event":"typing","username":"bob"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn encodes_outbound_message() {
        let frame = ClientFrame::Message { content: "hi".into(), sender: "alice".into() };
        let json = serde_json::to_string(&frame).unwrap();
        assert_eq!(json, r#"{"event":"message","content":"hi","sender":"alice"}"#);
    }
}
