//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// Registered marketplace users.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique display name (max 64 characters).
        display_name -> Varchar,
        /// Marketplace role: renter or owner.
        role -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp (auto-updated by trigger).
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Rentable items with per-day pricing and an availability window.
    listings (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning user.
        owner_id -> Uuid,
        /// Item title (max 128 characters).
        title -> Varchar,
        /// Free-text description.
        description -> Text,
        /// Item category: gear, vehicle, or room.
        category -> Varchar,
        /// Per-day price in minor currency units; positive.
        price_cents -> Int8,
        /// Ordered image URLs.
        images -> Array<Text>,
        /// Free-text location.
        location -> Text,
        /// Start of the bookable window.
        available_from -> Timestamptz,
        /// End of the bookable window.
        available_until -> Timestamptz,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp (auto-updated by trigger).
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Reservations of listings; guarded by a GiST exclusion constraint so
    /// non-cancelled bookings for one listing never overlap.
    bookings (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Reserved listing.
        listing_id -> Uuid,
        /// Requesting renter.
        renter_id -> Uuid,
        /// Stay start.
        start_at -> Timestamptz,
        /// Stay end; after `start_at`.
        end_at -> Timestamptz,
        /// Total in minor currency units; positive.
        total_cents -> Int8,
        /// Stored lifecycle state: pending, confirmed, or cancelled.
        status -> Varchar,
        /// Reason recorded on renter cancellation.
        cancellation_reason -> Nullable<Text>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp (auto-updated by trigger).
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// User-facing notification records.
    notifications (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Recipient.
        user_id -> Uuid,
        /// Event category: booking or message.
        kind -> Varchar,
        /// Human-readable notification text.
        message -> Text,
        /// Client route hint.
        link -> Text,
        /// Whether the recipient has read the notification.
        is_read -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Immutable chat messages.
    messages (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Sending user.
        sender_id -> Uuid,
        /// Receiving user.
        receiver_id -> Uuid,
        /// Message text.
        content -> Text,
        /// Send timestamp.
        sent_at -> Timestamptz,
    }
}

diesel::joinable!(bookings -> listings (listing_id));
diesel::joinable!(bookings -> users (renter_id));
diesel::joinable!(listings -> users (owner_id));

diesel::allow_tables_to_appear_in_same_query!(users, listings, bookings, notifications, messages);
