//! Shared WebSocket adapter state.
//!
//! The WebSocket entry point depends on the messaging driving port plus the
//! connection registry, keeping side effects out of the per-connection task.

use std::sync::Arc;

use crate::domain::ports::MessagingCommand;
use crate::inbound::ws::registry::ConnectionRegistry;

/// Dependency bundle for WebSocket handlers and connection tasks.
#[derive(Clone)]
pub struct WsState {
    /// Registry of connected sessions; also the live-delivery adapter.
    pub registry: ConnectionRegistry,
    /// Message send use-case.
    pub messaging: Arc<dyn MessagingCommand>,
}

impl WsState {
    /// Construct state from the registry and messaging port.
    pub fn new(registry: ConnectionRegistry, messaging: Arc<dyn MessagingCommand>) -> Self {
        Self {
            registry,
            messaging,
        }
    }
}
