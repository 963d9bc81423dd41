//! Port for best-effort live delivery to connected users.
//!
//! The messaging core knows nothing about connection management or transport.
//! Adapters (the WebSocket registry in production, fixtures in tests) accept a
//! `(user, event)` pair and report whether the push reached a connection.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Message, UserId};

/// Event pushed to a connected user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LiveEvent {
    /// A chat message addressed to the connected user.
    MessageReceived {
        /// The delivered message.
        message: Message,
    },
}

/// Port for pushing events to a user if they are currently connected.
///
/// Delivery is best-effort: `false` means "not delivered" (offline, closed
/// connection, serialisation failure) and MUST NOT be treated as an error by
/// callers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LiveDelivery: Send + Sync {
    /// Attempt to push `event` to `user`. Returns whether the push reached a
    /// live connection.
    async fn deliver_to(&self, user: &UserId, event: &LiveEvent) -> bool;
}

/// Fixture delivery that reports every user as offline.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineLiveDelivery;

#[async_trait]
impl LiveDelivery for OfflineLiveDelivery {
    async fn deliver_to(&self, _user: &UserId, _event: &LiveEvent) -> bool {
        false
    }
}
