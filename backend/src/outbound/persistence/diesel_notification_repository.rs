//! PostgreSQL-backed `NotificationRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{NotificationRepository, NotificationRepositoryError};
use crate::domain::{Notification, NotificationKind, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewNotificationRow, NotificationRow};
use super::pool::DbPool;
use super::schema::notifications;

/// Diesel-backed implementation of the notification repository port.
#[derive(Clone)]
pub struct DieselNotificationRepository {
    pool: DbPool,
}

impl DieselNotificationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_own_pool_error(error: super::pool::PoolError) -> NotificationRepositoryError {
    map_pool_error(error, NotificationRepositoryError::connection)
}

fn map_own_diesel_error(error: &diesel::result::Error) -> NotificationRepositoryError {
    map_diesel_error(
        error,
        NotificationRepositoryError::query,
        NotificationRepositoryError::connection,
    )
}

/// Convert a database row into a domain notification.
fn row_to_notification(row: NotificationRow) -> Result<Notification, NotificationRepositoryError> {
    let NotificationRow {
        id,
        user_id,
        kind,
        message,
        link,
        is_read,
        created_at,
    } = row;

    let kind: NotificationKind = kind
        .parse()
        .map_err(|_| NotificationRepositoryError::query("unknown notification kind in row"))?;

    Ok(Notification::from_record(
        id,
        UserId::from_uuid(user_id),
        kind,
        message,
        link,
        is_read,
        created_at,
    ))
}

#[async_trait]
impl NotificationRepository for DieselNotificationRepository {
    async fn insert(
        &self,
        notification: &Notification,
    ) -> Result<(), NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_own_pool_error)?;

        let row = NewNotificationRow {
            id: notification.id(),
            user_id: *notification.user_id().as_uuid(),
            kind: notification.kind().as_str(),
            message: notification.message(),
            link: notification.link(),
            is_read: notification.is_read(),
            created_at: notification.created_at(),
        };
        diesel::insert_into(notifications::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_own_diesel_error(&err))
    }

    async fn find_by_id(
        &self,
        notification_id: &Uuid,
    ) -> Result<Option<Notification>, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_own_pool_error)?;

        let row = notifications::table
            .find(notification_id)
            .select(NotificationRow::as_select())
            .first::<NotificationRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_own_diesel_error(&err))?;

        row.map(row_to_notification).transpose()
    }

    async fn list_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_own_pool_error)?;

        let rows: Vec<NotificationRow> = notifications::table
            .filter(notifications::user_id.eq(user.as_uuid()))
            .order(notifications::created_at.desc())
            .select(NotificationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_own_diesel_error(&err))?;

        rows.into_iter().map(row_to_notification).collect()
    }

    async fn update(
        &self,
        notification: &Notification,
    ) -> Result<(), NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_own_pool_error)?;

        diesel::update(notifications::table.find(notification.id()))
            .set(notifications::is_read.eq(notification.is_read()))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_own_diesel_error(&err))
    }

    async fn delete(&self, notification_id: &Uuid) -> Result<(), NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_own_pool_error)?;

        diesel::delete(notifications::table.find(notification_id))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_own_diesel_error(&err))
    }
}
