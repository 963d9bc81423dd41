//! Wire frames exchanged over the chat WebSocket.
//!
//! The frame names mirror the client's event vocabulary: a connected user
//! emits `sendMessage` and receives `receiveMessage` pushes for messages
//! addressed to them.

use serde::{Deserialize, Serialize};

use crate::domain::Message;
use crate::domain::ports::LiveEvent;

/// Frames a connected client may send.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientFrame {
    /// Send a chat message to another user.
    #[serde(rename_all = "camelCase")]
    SendMessage {
        /// Receiving user id.
        receiver_id: String,
        /// Message text.
        content: String,
    },
}

/// Chat message payload carried in server frames.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageFrame {
    /// Message identifier.
    pub id: String,
    /// Sending user.
    pub sender_id: String,
    /// Receiving user.
    pub receiver_id: String,
    /// Message text.
    pub content: String,
    /// Send timestamp.
    pub sent_at: String,
}

impl From<&Message> for MessageFrame {
    fn from(value: &Message) -> Self {
        Self {
            id: value.id().to_string(),
            sender_id: value.sender_id().to_string(),
            receiver_id: value.receiver_id().to_string(),
            content: value.content().to_owned(),
            sent_at: value.sent_at().to_rfc3339(),
        }
    }
}

/// Frames the server may push to a connected client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerFrame {
    /// A message addressed to the connected user arrived.
    #[serde(rename_all = "camelCase")]
    ReceiveMessage {
        /// The delivered message.
        message: MessageFrame,
    },
    /// Acknowledgement that the client's own send was persisted.
    #[serde(rename_all = "camelCase")]
    MessageSent {
        /// The persisted message.
        message: MessageFrame,
    },
    /// A client frame was rejected.
    #[serde(rename_all = "camelCase")]
    Error {
        /// Human-readable rejection reason.
        message: String,
    },
}

impl From<&LiveEvent> for ServerFrame {
    fn from(value: &LiveEvent) -> Self {
        match value {
            LiveEvent::MessageReceived { message } => Self::ReceiveMessage {
                message: message.into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the wire format.

    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::domain::UserId;

    #[test]
    fn client_frames_use_the_send_message_event_name() {
        let raw = serde_json::json!({
            "type": "sendMessage",
            "receiverId": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
            "content": "Hi",
        });
        let frame: ClientFrame = serde_json::from_value(raw).expect("frame parses");
        let ClientFrame::SendMessage {
            receiver_id,
            content,
        } = frame;
        assert_eq!(receiver_id, "3fa85f64-5717-4562-b3fc-2c963f66afa6");
        assert_eq!(content, "Hi");
    }

    #[test]
    fn live_events_serialise_as_receive_message_frames() {
        let message = Message::new(
            Uuid::new_v4(),
            UserId::random(),
            UserId::random(),
            "Hello",
            Utc::now(),
        )
        .expect("valid message");
        let frame = ServerFrame::from(&LiveEvent::MessageReceived {
            message: message.clone(),
        });
        let value = serde_json::to_value(frame).expect("frame serialises");
        assert_eq!(value["type"], "receiveMessage");
        assert_eq!(value["message"]["content"], "Hello");
        assert_eq!(value["message"]["senderId"], message.sender_id().to_string());
    }

    #[test]
    fn unknown_client_frames_fail_to_parse() {
        let raw = serde_json::json!({ "type": "joinRoom", "userId": "u1" });
        assert!(serde_json::from_value::<ClientFrame>(raw).is_err());
    }
}
