//! Shared helpers for HTTP adapter tests.

use std::sync::Arc;

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::Key;

use crate::domain::ports::{
    MockBookingCommand, MockBookingQuery, MockListingCommand, MockListingQuery, MockLoginService,
    MockMessagingCommand, MockMessagingQuery, MockNotificationsCommand, MockNotificationsQuery,
};
use crate::inbound::http::state::HttpState;

/// Cookie session middleware with a fixed key and lax settings for tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::from(&[7; 64]))
        .cookie_name("session".into())
        .cookie_secure(false)
        .build()
}

/// HTTP state wired to fresh mocks; panics when an unexpected port is hit.
pub fn mock_state() -> HttpState {
    HttpState {
        login: Arc::new(MockLoginService::new()),
        listings: Arc::new(MockListingCommand::new()),
        listings_query: Arc::new(MockListingQuery::new()),
        bookings: Arc::new(MockBookingCommand::new()),
        bookings_query: Arc::new(MockBookingQuery::new()),
        notifications: Arc::new(MockNotificationsCommand::new()),
        notifications_query: Arc::new(MockNotificationsQuery::new()),
        messaging: Arc::new(MockMessagingCommand::new()),
        messaging_query: Arc::new(MockMessagingQuery::new()),
    }
}
