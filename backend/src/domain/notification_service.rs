//! Notification dispatcher: records user-facing notifications and lets the
//! owning user read, acknowledge, and delete them.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use uuid::Uuid;

use crate::domain::ports::{
    DeleteNotificationRequest, MarkNotificationReadRequest, NotificationDispatch,
    NotificationPayload, NotificationRepository, NotificationRepositoryError,
    NotificationsCommand, NotificationsQuery,
};
use crate::domain::{Error, Notification, NotificationKind, UserId};

fn map_repo_error(error: NotificationRepositoryError) -> Error {
    match error {
        NotificationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("notification store unavailable: {message}"))
        }
        NotificationRepositoryError::Query { message } => {
            Error::internal(format!("notification store error: {message}"))
        }
    }
}

/// Notification service implementing dispatch, command, and query ports.
#[derive(Clone)]
pub struct NotificationService {
    notifications: Arc<dyn NotificationRepository>,
    clock: Arc<dyn Clock>,
}

impl NotificationService {
    /// Create a notification service over its store and clock.
    pub fn new(notifications: Arc<dyn NotificationRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            notifications,
            clock,
        }
    }

    /// Find a notification owned by `owner`, mapping absence and foreign
    /// ownership to the appropriate errors.
    async fn find_owned(
        &self,
        notification_id: &Uuid,
        owner: UserId,
    ) -> Result<Notification, Error> {
        let notification = self
            .notifications
            .find_by_id(notification_id)
            .await
            .map_err(map_repo_error)?
            .ok_or_else(|| Error::not_found(format!("notification {notification_id} not found")))?;
        if notification.user_id() != owner {
            return Err(Error::forbidden(
                "only the recipient can manage this notification",
            ));
        }
        Ok(notification)
    }
}

#[async_trait]
impl NotificationDispatch for NotificationService {
    async fn notify(
        &self,
        user: UserId,
        kind: NotificationKind,
        message: String,
        link: String,
    ) -> Result<NotificationPayload, Error> {
        let notification =
            Notification::new(Uuid::new_v4(), user, kind, message, link, self.clock.utc())
                .map_err(|err| Error::invalid_request(err.to_string()))?;
        self.notifications
            .insert(&notification)
            .await
            .map_err(map_repo_error)?;
        Ok(notification.into())
    }
}

#[async_trait]
impl NotificationsCommand for NotificationService {
    async fn mark_read(
        &self,
        request: MarkNotificationReadRequest,
    ) -> Result<NotificationPayload, Error> {
        let notification = self
            .find_owned(&request.notification_id, request.principal.id)
            .await?
            .marked_read();
        self.notifications
            .update(&notification)
            .await
            .map_err(map_repo_error)?;
        Ok(notification.into())
    }

    async fn delete(&self, request: DeleteNotificationRequest) -> Result<(), Error> {
        let notification = self
            .find_owned(&request.notification_id, request.principal.id)
            .await?;
        self.notifications
            .delete(&notification.id())
            .await
            .map_err(map_repo_error)
    }
}

#[async_trait]
impl NotificationsQuery for NotificationService {
    async fn list_notifications(&self, user: UserId) -> Result<Vec<NotificationPayload>, Error> {
        let listed = self
            .notifications
            .list_for_user(&user)
            .await
            .map_err(map_repo_error)?;
        Ok(listed.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
#[path = "notification_service_tests.rs"]
mod tests;
