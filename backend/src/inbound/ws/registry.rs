//! Process-wide registry of connected WebSocket sessions.
//!
//! Implements the domain's live-delivery port: given a user and an event,
//! push the event if that user currently holds a connection. The messaging
//! core never sees connection lifecycle.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::domain::UserId;
use crate::domain::ports::{LiveDelivery, LiveEvent};
use crate::inbound::ws::messages::ServerFrame;

/// Shared map of connected users to their WebSocket send handles.
///
/// A user holds at most one connection; a new connection replaces the old
/// handle, whose task will wind down when its stream closes.
#[derive(Clone, Default)]
pub struct ConnectionRegistry {
    inner: Arc<RwLock<HashMap<Uuid, actix_ws::Session>>>,
}

impl ConnectionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `user`'s connection, replacing any previous one.
    pub async fn register(&self, user: UserId, session: actix_ws::Session) {
        let replaced = self
            .inner
            .write()
            .await
            .insert(*user.as_uuid(), session)
            .is_some();
        debug!(user = %user, replaced, "websocket connection registered");
    }

    /// Remove `user`'s connection if present.
    pub async fn unregister(&self, user: &UserId) {
        self.inner.write().await.remove(user.as_uuid());
        debug!(user = %user, "websocket connection unregistered");
    }

    /// Number of currently registered connections.
    pub async fn connected(&self) -> usize {
        self.inner.read().await.len()
    }
}

#[async_trait]
impl LiveDelivery for ConnectionRegistry {
    async fn deliver_to(&self, user: &UserId, event: &LiveEvent) -> bool {
        let session = self.inner.read().await.get(user.as_uuid()).cloned();
        let Some(mut session) = session else {
            return false;
        };
        let Ok(text) = serde_json::to_string(&ServerFrame::from(event)) else {
            return false;
        };
        if session.text(text).await.is_err() {
            // The peer went away between lookup and send.
            self.unregister(user).await;
            return false;
        }
        true
    }
}
