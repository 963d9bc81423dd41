//! PostgreSQL-backed `MessageRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{MessageRepository, MessageRepositoryError};
use crate::domain::{Message, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{MessageRow, NewMessageRow};
use super::pool::DbPool;
use super::schema::messages;

/// Diesel-backed implementation of the message repository port.
#[derive(Clone)]
pub struct DieselMessageRepository {
    pool: DbPool,
}

impl DieselMessageRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_own_pool_error(error: super::pool::PoolError) -> MessageRepositoryError {
    map_pool_error(error, MessageRepositoryError::connection)
}

fn map_own_diesel_error(error: &diesel::result::Error) -> MessageRepositoryError {
    map_diesel_error(
        error,
        MessageRepositoryError::query,
        MessageRepositoryError::connection,
    )
}

/// Convert a database row into a validated domain message.
fn row_to_message(row: MessageRow) -> Result<Message, MessageRepositoryError> {
    let MessageRow {
        id,
        sender_id,
        receiver_id,
        content,
        sent_at,
    } = row;

    Message::new(
        id,
        UserId::from_uuid(sender_id),
        UserId::from_uuid(receiver_id),
        content,
        sent_at,
    )
    .map_err(|err| MessageRepositoryError::query(err.to_string()))
}

#[async_trait]
impl MessageRepository for DieselMessageRepository {
    async fn insert(&self, message: &Message) -> Result<(), MessageRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_own_pool_error)?;

        let row = NewMessageRow {
            id: message.id(),
            sender_id: *message.sender_id().as_uuid(),
            receiver_id: *message.receiver_id().as_uuid(),
            content: message.content(),
            sent_at: message.sent_at(),
        };
        diesel::insert_into(messages::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_own_diesel_error(&err))
    }

    async fn conversation(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<Vec<Message>, MessageRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_own_pool_error)?;

        let rows: Vec<MessageRow> = messages::table
            .filter(
                messages::sender_id
                    .eq(a.as_uuid())
                    .and(messages::receiver_id.eq(b.as_uuid()))
                    .or(messages::sender_id
                        .eq(b.as_uuid())
                        .and(messages::receiver_id.eq(a.as_uuid()))),
            )
            .order(messages::sent_at.asc())
            .select(MessageRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_own_diesel_error(&err))?;

        rows.into_iter().map(row_to_message).collect()
    }

    async fn list_touching_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<Message>, MessageRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_own_pool_error)?;

        let rows: Vec<MessageRow> = messages::table
            .filter(
                messages::sender_id
                    .eq(user.as_uuid())
                    .or(messages::receiver_id.eq(user.as_uuid())),
            )
            .order(messages::sent_at.desc())
            .select(MessageRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_own_diesel_error(&err))?;

        rows.into_iter().map(row_to_message).collect()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for row conversion edge cases.

    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn row_conversion_produces_a_message() {
        let row = MessageRow {
            id: Uuid::new_v4(),
            sender_id: Uuid::new_v4(),
            receiver_id: Uuid::new_v4(),
            content: "Hi".to_owned(),
            sent_at: Utc::now(),
        };
        let message = row_to_message(row.clone()).expect("valid row converts");
        assert_eq!(message.id(), row.id);
        assert_eq!(message.content(), "Hi");
    }

    #[test]
    fn row_conversion_rejects_corrupt_rows() {
        let user = Uuid::new_v4();
        let row = MessageRow {
            id: Uuid::new_v4(),
            sender_id: user,
            receiver_id: user,
            content: "echo".to_owned(),
            sent_at: Utc::now(),
        };
        let error = row_to_message(row).expect_err("self-addressed row fails");
        assert!(matches!(error, MessageRepositoryError::Query { .. }));
    }
}
