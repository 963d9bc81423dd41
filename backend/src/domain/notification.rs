//! User-facing notification records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::user::UserId;

/// Validation errors raised by [`Notification::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationValidationError {
    /// The message text is empty after trimming.
    EmptyMessage,
    /// The kind string matches no known notification kind.
    UnknownKind,
}

impl fmt::Display for NotificationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "notification message must not be empty"),
            Self::UnknownKind => write!(f, "notification kind must be booking or message"),
        }
    }
}

impl std::error::Error for NotificationValidationError {}

/// Event category a notification describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A booking was requested, confirmed, or cancelled.
    Booking,
    /// A chat message arrived.
    Message,
}

impl NotificationKind {
    /// Stable string form used in persistence and the API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Booking => "booking",
            Self::Message => "message",
        }
    }
}

impl std::str::FromStr for NotificationKind {
    type Err = NotificationValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "booking" => Ok(Self::Booking),
            "message" => Ok(Self::Message),
            _ => Err(NotificationValidationError::UnknownKind),
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An asynchronous, user-visible record of an event concerning a user.
///
/// Only the owning user may mark a notification read or delete it.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    id: Uuid,
    user_id: UserId,
    kind: NotificationKind,
    message: String,
    link: String,
    is_read: bool,
    created_at: DateTime<Utc>,
}

impl Notification {
    /// Validate and construct an unread notification.
    pub fn new(
        id: Uuid,
        user_id: UserId,
        kind: NotificationKind,
        message: impl Into<String>,
        link: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, NotificationValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(NotificationValidationError::EmptyMessage);
        }
        Ok(Self {
            id,
            user_id,
            kind,
            message,
            link: link.into(),
            is_read: false,
            created_at,
        })
    }

    /// Reconstitute a notification from storage without re-validating.
    #[must_use]
    pub fn from_record(
        id: Uuid,
        user_id: UserId,
        kind: NotificationKind,
        message: String,
        link: String,
        is_read: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            kind,
            message,
            link,
            is_read,
            created_at,
        }
    }

    /// Stable notification identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Recipient.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Event category.
    #[must_use]
    pub const fn kind(&self) -> NotificationKind {
        self.kind
    }

    /// Human-readable notification text.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Client route hint for navigating to the event.
    #[must_use]
    pub fn link(&self) -> &str {
        self.link.as_str()
    }

    /// Whether the recipient has read this notification.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        self.is_read
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Copy of this notification marked as read.
    #[must_use]
    pub fn marked_read(mut self) -> Self {
        self.is_read = true;
        self
    }
}
