//! Driving port for listing reads.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ports::listing_repository::ListingFilter;
use crate::domain::{Category, Error, Listing, UserId};

/// Serialisable listing projection returned by driving ports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPayload {
    /// Listing identifier.
    pub id: Uuid,
    /// Owning user.
    pub owner_id: UserId,
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

impl From<Listing> for ListingPayload {
    fn from(value: Listing) -> Self {
        Self {
            id: value.id(),
            owner_id: value.owner(),
            title: value.title().to_owned(),
            description: value.description().to_owned(),
            category: value.category(),
            price_cents: value.price_cents(),
            images: value.images().to_vec(),
            location: value.location().to_owned(),
            available_from: value.availability().start_at(),
            available_until: value.availability().end_at(),
        }
    }
}

/// Request to search public listings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchListingsRequest {
    /// Search criteria; empty filters match everything.
    pub filter: ListingFilter,
}

/// Driving port for listing read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingQuery: Send + Sync {
    /// Read a single listing.
    async fn get_listing(&self, listing_id: Uuid) -> Result<ListingPayload, Error>;

    /// Search listings matching the filter, newest-first.
    async fn search_listings(
        &self,
        request: SearchListingsRequest,
    ) -> Result<Vec<ListingPayload>, Error>;

    /// All listings created by `owner`, newest-first.
    async fn list_for_owner(&self, owner: UserId) -> Result<Vec<ListingPayload>, Error>;
}
