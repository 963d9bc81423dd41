//! Messaging relay: persists chat messages, pushes them to connected
//! receivers, and records message notifications.
//!
//! Persistence is the durable side effect. Live delivery and the receiver's
//! notification run after the message committed and are best-effort: neither
//! can fail or block the send.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::ports::{
    LiveDelivery, LiveEvent, MessageRepository, MessageRepositoryError, MessagingCommand,
    MessagingQuery, NotificationDispatch, SendMessageRequest, UserRepository,
    UserRepositoryError,
};
use crate::domain::{Error, Message, NotificationKind, Principal, UserId};

fn map_message_repo_error(error: MessageRepositoryError) -> Error {
    match error {
        MessageRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("message store unavailable: {message}"))
        }
        MessageRepositoryError::Query { message } => {
            Error::internal(format!("message store error: {message}"))
        }
    }
}

fn map_user_repo_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user store unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user store error: {message}"))
        }
    }
}

/// Messaging relay implementing the messaging command and query ports.
#[derive(Clone)]
pub struct MessagingService {
    messages: Arc<dyn MessageRepository>,
    users: Arc<dyn UserRepository>,
    dispatcher: Arc<dyn NotificationDispatch>,
    delivery: Arc<dyn LiveDelivery>,
    clock: Arc<dyn Clock>,
}

impl MessagingService {
    /// Create a messaging relay over its stores, dispatcher, and delivery port.
    pub fn new(
        messages: Arc<dyn MessageRepository>,
        users: Arc<dyn UserRepository>,
        dispatcher: Arc<dyn NotificationDispatch>,
        delivery: Arc<dyn LiveDelivery>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            messages,
            users,
            dispatcher,
            delivery,
            clock,
        }
    }

    /// Display name of the sender for the receiver's notification text.
    async fn sender_name(&self, sender: UserId) -> String {
        match self.users.find_by_id(&sender).await {
            Ok(Some(user)) => user.display_name().to_owned(),
            Ok(None) => "a user".to_owned(),
            Err(error) => {
                warn!(%error, "sender lookup failed for message notification");
                "a user".to_owned()
            }
        }
    }
}

#[async_trait]
impl MessagingCommand for MessagingService {
    async fn send_message(&self, request: SendMessageRequest) -> Result<Message, Error> {
        let SendMessageRequest {
            principal,
            receiver_id,
            content,
        } = request;

        self.users
            .find_by_id(&receiver_id)
            .await
            .map_err(map_user_repo_error)?
            .ok_or_else(|| Error::not_found(format!("user {receiver_id} not found")))?;

        let message = Message::new(
            Uuid::new_v4(),
            principal.id,
            receiver_id,
            content,
            self.clock.utc(),
        )
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        self.messages
            .insert(&message)
            .await
            .map_err(map_message_repo_error)?;

        let delivered = self
            .delivery
            .deliver_to(
                &receiver_id,
                &LiveEvent::MessageReceived {
                    message: message.clone(),
                },
            )
            .await;
        debug!(receiver = %receiver_id, delivered, "live delivery attempted");

        let sender_name = self.sender_name(principal.id).await;
        if let Err(error) = self
            .dispatcher
            .notify(
                receiver_id,
                NotificationKind::Message,
                format!("New message from {sender_name}"),
                format!("/chat/{}", principal.id),
            )
            .await
        {
            warn!(%error, recipient = %receiver_id, "message notification dispatch failed");
        }

        Ok(message)
    }
}

#[async_trait]
impl MessagingQuery for MessagingService {
    async fn get_conversation(
        &self,
        principal: Principal,
        other: UserId,
    ) -> Result<Vec<Message>, Error> {
        self.messages
            .conversation(&principal.id, &other)
            .await
            .map_err(map_message_repo_error)
    }

    async fn get_inbox(&self, principal: Principal) -> Result<Vec<Message>, Error> {
        let listed = self
            .messages
            .list_touching_user(&principal.id)
            .await
            .map_err(map_message_repo_error)?;

        // Messages arrive newest-first; keep the first one seen per
        // counterpart to end up with the latest message per conversation.
        let mut seen = HashSet::new();
        let mut inbox = Vec::new();
        for message in listed {
            let Some(counterpart) = message.counterpart_of(principal.id) else {
                continue;
            };
            if seen.insert(counterpart) {
                inbox.push(message);
            }
        }
        Ok(inbox)
    }
}

#[cfg(test)]
#[path = "messaging_service_tests.rs"]
mod tests;
