//! Chat messages exchanged between two users.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::user::UserId;

/// Maximum allowed length for message content.
pub const CONTENT_MAX: usize = 4_000;

/// Validation errors raised by [`Message::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageValidationError {
    /// The content is empty after trimming.
    EmptyContent,
    /// The content exceeds [`CONTENT_MAX`] characters.
    ContentTooLong {
        /// Maximum permitted length.
        max: usize,
    },
    /// Sender and receiver are the same user.
    SelfAddressed,
}

impl fmt::Display for MessageValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyContent => write!(f, "message content must not be empty"),
            Self::ContentTooLong { max } => {
                write!(f, "message content must be at most {max} characters")
            }
            Self::SelfAddressed => write!(f, "messages cannot be sent to yourself"),
        }
    }
}

impl std::error::Error for MessageValidationError {}

/// An immutable chat message; readable by its sender and receiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    id: Uuid,
    sender_id: UserId,
    receiver_id: UserId,
    content: String,
    sent_at: DateTime<Utc>,
}

impl Message {
    /// Validate and construct a message.
    pub fn new(
        id: Uuid,
        sender_id: UserId,
        receiver_id: UserId,
        content: impl Into<String>,
        sent_at: DateTime<Utc>,
    ) -> Result<Self, MessageValidationError> {
        if sender_id == receiver_id {
            return Err(MessageValidationError::SelfAddressed);
        }
        let content = content.into();
        if content.trim().is_empty() {
            return Err(MessageValidationError::EmptyContent);
        }
        if content.chars().count() > CONTENT_MAX {
            return Err(MessageValidationError::ContentTooLong { max: CONTENT_MAX });
        }
        Ok(Self {
            id,
            sender_id,
            receiver_id,
            content,
            sent_at,
        })
    }

    /// Stable message identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Sending user.
    #[must_use]
    pub const fn sender_id(&self) -> UserId {
        self.sender_id
    }

    /// Receiving user.
    #[must_use]
    pub const fn receiver_id(&self) -> UserId {
        self.receiver_id
    }

    /// Message text.
    #[must_use]
    pub fn content(&self) -> &str {
        self.content.as_str()
    }

    /// Send timestamp.
    #[must_use]
    pub const fn sent_at(&self) -> DateTime<Utc> {
        self.sent_at
    }

    /// The conversation partner from `user`'s point of view.
    ///
    /// Returns `None` when `user` is not a participant of this message.
    #[must_use]
    pub fn counterpart_of(&self, user: UserId) -> Option<UserId> {
        if user == self.sender_id {
            Some(self.receiver_id)
        } else if user == self.receiver_id {
            Some(self.sender_id)
        } else {
            None
        }
    }
}
