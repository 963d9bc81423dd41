//! Inbound adapters: HTTP REST endpoints and the WebSocket chat entry.

pub mod http;
pub mod ws;
