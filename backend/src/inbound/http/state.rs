//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    BookingCommand, BookingQuery, ListingCommand, ListingQuery, LoginService, MessagingCommand,
    MessagingQuery, NotificationsCommand, NotificationsQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Login and identity reads.
    pub login: Arc<dyn LoginService>,
    /// Listing mutations.
    pub listings: Arc<dyn ListingCommand>,
    /// Listing reads.
    pub listings_query: Arc<dyn ListingQuery>,
    /// Booking mutations.
    pub bookings: Arc<dyn BookingCommand>,
    /// Booking reads.
    pub bookings_query: Arc<dyn BookingQuery>,
    /// Notification mutations.
    pub notifications: Arc<dyn NotificationsCommand>,
    /// Notification reads.
    pub notifications_query: Arc<dyn NotificationsQuery>,
    /// Message sends.
    pub messaging: Arc<dyn MessagingCommand>,
    /// Conversation and inbox reads.
    pub messaging_query: Arc<dyn MessagingQuery>,
}
