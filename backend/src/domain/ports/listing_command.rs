//! Driving port for listing mutations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::ports::listing_query::ListingPayload;
use crate::domain::{Category, Error, Principal};

/// Owner-supplied listing fields for creation and update.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingDraftPayload {
    /// Short item title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Item category.
    pub category: Category,
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
}

/// Request to create a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateListingRequest {
    /// Authenticated owner.
    pub principal: Principal,
    /// Listing fields.
    pub draft: ListingDraftPayload,
}

/// Request to replace a listing's fields.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateListingRequest {
    /// Authenticated owner.
    pub principal: Principal,
    /// Listing to update.
    pub listing_id: Uuid,
    /// Replacement fields.
    pub draft: ListingDraftPayload,
}

/// Request to delete a listing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeleteListingRequest {
    /// Authenticated owner.
    pub principal: Principal,
    /// Listing to delete.
    pub listing_id: Uuid,
}

/// Driving port for listing write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingCommand: Send + Sync {
    /// Create a listing owned by the authenticated user (owner role only).
    async fn create_listing(&self, request: CreateListingRequest)
    -> Result<ListingPayload, Error>;

    /// Replace a listing's fields; only its owner may do so.
    async fn update_listing(&self, request: UpdateListingRequest)
    -> Result<ListingPayload, Error>;

    /// Delete a listing; blocked with `Conflict` while non-cancelled bookings
    /// with future end dates reference it.
    async fn delete_listing(&self, request: DeleteListingRequest) -> Result<(), Error>;
}
