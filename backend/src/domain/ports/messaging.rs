//! Driving ports for the messaging relay.

use async_trait::async_trait;

use crate::domain::{Error, Message, Principal, UserId};

/// Request to send a chat message.
#[derive(Debug, Clone, PartialEq)]
pub struct SendMessageRequest {
    /// Authenticated sender.
    pub principal: Principal,
    /// Receiving user.
    pub receiver_id: UserId,
    /// Message text.
    pub content: String,
}

/// Driving port for sending chat messages.
///
/// Persistence is the durable side effect; live delivery to a connected
/// receiver and the receiver's notification are best-effort follow-ups that
/// never fail the send.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagingCommand: Send + Sync {
    /// Persist a message, then attempt live delivery and notify the receiver.
    async fn send_message(&self, request: SendMessageRequest) -> Result<Message, Error>;
}

/// Driving port for reading conversations and the inbox.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagingQuery: Send + Sync {
    /// Both directions of the caller's conversation with `other`, oldest-first.
    async fn get_conversation(
        &self,
        principal: Principal,
        other: UserId,
    ) -> Result<Vec<Message>, Error>;

    /// One entry per distinct conversation partner: the most recent message
    /// with that partner, newest-first.
    async fn get_inbox(&self, principal: Principal) -> Result<Vec<Message>, Error>;
}
