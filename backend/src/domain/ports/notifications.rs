//! Driving ports for the notification dispatcher.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Error, Notification, NotificationKind, Principal, UserId};

/// Serialisable notification projection returned by driving ports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    /// Notification identifier.
    pub id: Uuid,
    /// Recipient.
    pub user_id: UserId,
    /// Event category.
    pub kind: NotificationKind,
    /// Human-readable notification text.
    pub message: String,
    /// Client route hint.
    pub link: String,
    /// Whether the recipient has read this notification.
    pub is_read: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationPayload {
    fn from(value: Notification) -> Self {
        Self {
            id: value.id(),
            user_id: value.user_id(),
            kind: value.kind(),
            message: value.message().to_owned(),
            link: value.link().to_owned(),
            is_read: value.is_read(),
            created_at: value.created_at(),
        }
    }
}

/// Port used by other services to record a notification for a user.
///
/// Dispatch is fire-and-forget relative to the triggering operation: callers
/// log a failed dispatch and carry on. There is no retry or backoff.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationDispatch: Send + Sync {
    /// Record a notification for `user`.
    async fn notify(
        &self,
        user: UserId,
        kind: NotificationKind,
        message: String,
        link: String,
    ) -> Result<NotificationPayload, Error>;
}

/// Request to mark a notification read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkNotificationReadRequest {
    /// Authenticated caller; must own the notification.
    pub principal: Principal,
    /// Notification to mark.
    pub notification_id: Uuid,
}

/// Request to delete a notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeleteNotificationRequest {
    /// Authenticated caller; must own the notification.
    pub principal: Principal,
    /// Notification to delete.
    pub notification_id: Uuid,
}

/// Driving port for a user managing their own notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationsCommand: Send + Sync {
    /// Mark one of the caller's notifications read.
    async fn mark_read(
        &self,
        request: MarkNotificationReadRequest,
    ) -> Result<NotificationPayload, Error>;

    /// Delete one of the caller's notifications.
    async fn delete(&self, request: DeleteNotificationRequest) -> Result<(), Error>;
}

/// Driving port for reading a user's notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationsQuery: Send + Sync {
    /// The caller's notifications, newest-first.
    async fn list_notifications(&self, user: UserId) -> Result<Vec<NotificationPayload>, Error>;
}
