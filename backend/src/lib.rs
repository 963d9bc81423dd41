//! Epic Journey Rentals backend: booking engine, notification dispatcher,
//! messaging relay, and the listing store behind an actix-web REST and
//! WebSocket surface.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use doc::ApiDoc;
pub use middleware::Trace;
