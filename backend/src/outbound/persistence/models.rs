//! Diesel row models mapping between the schema and domain constructors.
//!
//! Row structs stay dumb: repositories convert them through validated domain
//! constructors so invalid rows surface as query errors instead of panics.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{bookings, listings, messages, notifications, users};

/// Read model for the `users` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// Primary key.
    pub id: Uuid,
    /// Unique display name.
    pub display_name: String,
    /// Marketplace role string.
    pub role: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for the `users` table.
#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow<'a> {
    /// Primary key.
    pub id: Uuid,
    /// Unique display name.
    pub display_name: &'a str,
    /// Marketplace role string.
    pub role: &'a str,
}

/// Read model for the `listings` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = listings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ListingRow {
    /// Primary key.
    pub id: Uuid,
    /// Owning user.
    pub owner_id: Uuid,
    /// Item title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Category string.
    pub category: String,
    /// Per-day price in minor currency units.
    pub price_cents: i64,
    /// Ordered image URLs.
    pub images: Vec<String>,
    /// Free-text location.
    pub location: String,
    /// Start of the bookable window.
    pub available_from: DateTime<Utc>,
    /// End of the bookable window.
    pub available_until: DateTime<Utc>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for the `listings` table.
#[derive(Debug, Insertable)]
#[diesel(table_name = listings)]
pub struct NewListingRow<'a> {
    /// Primary key.
    pub id: Uuid,
    /// Owning user.
    pub owner_id: Uuid,
    /// Item title.
    pub title: &'a str,
    /// Free-text description.
    pub description: &'a str,
    /// Category string.
    pub category: &'a str,
    /// Per-day price in minor currency units.
    pub price_cents: i64,
    /// Ordered image URLs.
    pub images: &'a [String],
    /// Free-text location.
    pub location: &'a str,
    /// Start of the bookable window.
    pub available_from: DateTime<Utc>,
    /// End of the bookable window.
    pub available_until: DateTime<Utc>,
}

/// Update model replacing a listing's mutable fields.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = listings)]
pub struct ListingChangeset<'a> {
    /// Item title.
    pub title: &'a str,
    /// Free-text description.
    pub description: &'a str,
    /// Category string.
    pub category: &'a str,
    /// Per-day price in minor currency units.
    pub price_cents: i64,
    /// Ordered image URLs.
    pub images: &'a [String],
    /// Free-text location.
    pub location: &'a str,
    /// Start of the bookable window.
    pub available_from: DateTime<Utc>,
    /// End of the bookable window.
    pub available_until: DateTime<Utc>,
}

/// Read model for the `bookings` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BookingRow {
    /// Primary key.
    pub id: Uuid,
    /// Reserved listing.
    pub listing_id: Uuid,
    /// Requesting renter.
    pub renter_id: Uuid,
    /// Stay start.
    pub start_at: DateTime<Utc>,
    /// Stay end.
    pub end_at: DateTime<Utc>,
    /// Total in minor currency units.
    pub total_cents: i64,
    /// Stored status string.
    pub status: String,
    /// Reason recorded on renter cancellation.
    pub cancellation_reason: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for the `bookings` table.
///
/// Owns its data so the insert can move into the write transaction.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bookings)]
pub struct NewBookingRow {
    /// Primary key.
    pub id: Uuid,
    /// Reserved listing.
    pub listing_id: Uuid,
    /// Requesting renter.
    pub renter_id: Uuid,
    /// Stay start.
    pub start_at: DateTime<Utc>,
    /// Stay end.
    pub end_at: DateTime<Utc>,
    /// Total in minor currency units.
    pub total_cents: i64,
    /// Stored status string.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Update model for a booking's status and cancellation reason.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = bookings)]
pub struct BookingStatusChangeset<'a> {
    /// Stored status string.
    pub status: &'a str,
    /// Reason recorded on renter cancellation.
    pub cancellation_reason: Option<&'a str>,
}

/// Read model for the `notifications` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NotificationRow {
    /// Primary key.
    pub id: Uuid,
    /// Recipient.
    pub user_id: Uuid,
    /// Kind string.
    pub kind: String,
    /// Notification text.
    pub message: String,
    /// Client route hint.
    pub link: String,
    /// Whether the recipient has read the notification.
    pub is_read: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for the `notifications` table.
#[derive(Debug, Insertable)]
#[diesel(table_name = notifications)]
pub struct NewNotificationRow<'a> {
    /// Primary key.
    pub id: Uuid,
    /// Recipient.
    pub user_id: Uuid,
    /// Kind string.
    pub kind: &'a str,
    /// Notification text.
    pub message: &'a str,
    /// Client route hint.
    pub link: &'a str,
    /// Whether the recipient has read the notification.
    pub is_read: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Read model for the `messages` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MessageRow {
    /// Primary key.
    pub id: Uuid,
    /// Sending user.
    pub sender_id: Uuid,
    /// Receiving user.
    pub receiver_id: Uuid,
    /// Message text.
    pub content: String,
    /// Send timestamp.
    pub sent_at: DateTime<Utc>,
}

/// Insert model for the `messages` table.
#[derive(Debug, Insertable)]
#[diesel(table_name = messages)]
pub struct NewMessageRow<'a> {
    /// Primary key.
    pub id: Uuid,
    /// Sending user.
    pub sender_id: Uuid,
    /// Receiving user.
    pub receiver_id: Uuid,
    /// Message text.
    pub content: &'a str,
    /// Send timestamp.
    pub sent_at: DateTime<Utc>,
}
