//! Port for notification persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Notification, UserId};

/// Errors raised by notification repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotificationRepositoryError {
    /// Repository connection could not be established.
    #[error("notification repository connection failed: {message}")]
    Connection {
        /// Adapter-specific failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("notification repository query failed: {message}")]
    Query {
        /// Adapter-specific failure description.
        message: String,
    },
}

impl NotificationRepositoryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port for writing and reading notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Persist a new notification.
    async fn insert(&self, notification: &Notification)
    -> Result<(), NotificationRepositoryError>;

    /// Find a notification by id.
    async fn find_by_id(
        &self,
        notification_id: &Uuid,
    ) -> Result<Option<Notification>, NotificationRepositoryError>;

    /// All notifications for `user`, newest-first.
    async fn list_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<Notification>, NotificationRepositoryError>;

    /// Persist a notification's read flag.
    async fn update(&self, notification: &Notification)
    -> Result<(), NotificationRepositoryError>;

    /// Delete a notification.
    async fn delete(&self, notification_id: &Uuid) -> Result<(), NotificationRepositoryError>;
}

/// Fixture implementation for tests that do not exercise notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNotificationRepository;

#[async_trait]
impl NotificationRepository for FixtureNotificationRepository {
    async fn insert(
        &self,
        _notification: &Notification,
    ) -> Result<(), NotificationRepositoryError> {
        Ok(())
    }

    async fn find_by_id(
        &self,
        _notification_id: &Uuid,
    ) -> Result<Option<Notification>, NotificationRepositoryError> {
        Ok(None)
    }

    async fn list_for_user(
        &self,
        _user: &UserId,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        Ok(Vec::new())
    }

    async fn update(
        &self,
        _notification: &Notification,
    ) -> Result<(), NotificationRepositoryError> {
        Ok(())
    }

    async fn delete(&self, _notification_id: &Uuid) -> Result<(), NotificationRepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;

    #[tokio::test]
    async fn fixture_list_returns_empty() {
        let repo = FixtureNotificationRepository;
        let listed = repo
            .list_for_user(&UserId::random())
            .await
            .expect("fixture list succeeds");
        assert!(listed.is_empty());
    }

    #[test]
    fn connection_error_formats_message() {
        let err = NotificationRepositoryError::connection("pool exhausted");
        assert!(err.to_string().contains("pool exhausted"));
    }
}
