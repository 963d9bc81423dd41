//! Port for chat message persistence.

use async_trait::async_trait;

use crate::domain::{Message, UserId};

/// Errors raised by message repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageRepositoryError {
    /// Repository connection could not be established.
    #[error("message repository connection failed: {message}")]
    Connection {
        /// Adapter-specific failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("message repository query failed: {message}")]
    Query {
        /// Adapter-specific failure description.
        message: String,
    },
}

impl MessageRepositoryError {
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

/// Port for writing and reading chat messages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Persist a new message.
    async fn insert(&self, message: &Message) -> Result<(), MessageRepositoryError>;

    /// Both directions of the conversation between two users, oldest-first.
    async fn conversation(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<Vec<Message>, MessageRepositoryError>;

    /// Every message sent or received by `user`, newest-first.
    ///
    /// Inbox grouping (latest message per counterpart) happens in the domain
    /// service, mirroring how small the persisted query surface needs to be.
    async fn list_touching_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<Message>, MessageRepositoryError>;
}

/// Fixture implementation for tests that do not exercise messaging.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMessageRepository;

#[async_trait]
impl MessageRepository for FixtureMessageRepository {
    async fn insert(&self, _message: &Message) -> Result<(), MessageRepositoryError> {
        Ok(())
    }

    async fn conversation(
        &self,
        _a: &UserId,
        _b: &UserId,
    ) -> Result<Vec<Message>, MessageRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_touching_user(
        &self,
        _user: &UserId,
    ) -> Result<Vec<Message>, MessageRepositoryError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;

    #[tokio::test]
    async fn fixture_conversation_returns_empty() {
        let repo = FixtureMessageRepository;
        let listed = repo
            .conversation(&UserId::random(), &UserId::random())
            .await
            .expect("fixture conversation succeeds");
        assert!(listed.is_empty());
    }

    #[test]
    fn query_error_formats_message() {
        let err = MessageRepositoryError::query("broken sql");
        assert!(err.to_string().contains("broken sql"));
    }
}
