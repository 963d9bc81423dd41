//! Driving port for booking reads.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ports::booking_repository::{BookingDetails, ListingSummary, UserSummary};
use crate::domain::{Booking, BookingStatus, Error, Principal, UserId};

/// Serialisable booking projection returned by driving ports.
///
/// `status` is the *effective* status at read time, so confirmed bookings
/// whose period has begun appear as `active` or `completed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    /// Booking identifier.
    pub id: Uuid,
    /// Reserved listing.
    pub listing_id: Uuid,
    /// Requesting renter.
    pub renter_id: UserId,
    /// Stay start.
    pub start_at: DateTime<Utc>,
    /// Stay end.
    pub end_at: DateTime<Utc>,
    /// Total in minor currency units.
    pub total_cents: i64,
    /// Effective lifecycle state at read time.
    pub status: BookingStatus,
    /// Reason recorded on renter cancellation.
    pub cancellation_reason: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl BookingPayload {
    /// Project a booking as observed at `now`.
    #[must_use]
    pub fn observed_at(booking: &Booking, now: DateTime<Utc>) -> Self {
        Self {
            id: booking.id(),
            listing_id: booking.listing_id(),
            renter_id: booking.renter(),
            start_at: booking.period().start_at(),
            end_at: booking.period().end_at(),
            total_cents: booking.total_cents(),
            status: booking.effective_status(now),
            cancellation_reason: booking.cancellation_reason().map(str::to_owned),
            created_at: booking.created_at(),
        }
    }
}

/// Serialisable listing summary attached to booking reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingSummaryPayload {
    /// Listing identifier.
    pub id: Uuid,
    /// Listing title.
    pub title: String,
    /// Per-day price in minor currency units.
    pub price_cents: i64,
    /// Listing owner.
    pub owner_id: UserId,
}

impl From<ListingSummary> for ListingSummaryPayload {
    fn from(value: ListingSummary) -> Self {
        Self {
            id: value.id,
            title: value.title,
            price_cents: value.price_cents,
            owner_id: value.owner_id,
        }
    }
}

/// Serialisable user summary attached to booking reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummaryPayload {
    /// User identifier.
    pub id: UserId,
    /// Display name shown to other users.
    pub display_name: String,
}

impl From<UserSummary> for UserSummaryPayload {
    fn from(value: UserSummary) -> Self {
        Self {
            id: value.id,
            display_name: value.display_name,
        }
    }
}

/// A booking with its listing and renter summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetailsPayload {
    /// The booking projection.
    pub booking: BookingPayload,
    /// Summary of the reserved listing.
    pub listing: ListingSummaryPayload,
    /// Summary of the requesting renter.
    pub renter: UserSummaryPayload,
}

impl BookingDetailsPayload {
    /// Project joined booking details as observed at `now`.
    #[must_use]
    pub fn observed_at(details: BookingDetails, now: DateTime<Utc>) -> Self {
        let BookingDetails {
            booking,
            listing,
            renter,
        } = details;
        Self {
            booking: BookingPayload::observed_at(&booking, now),
            listing: listing.into(),
            renter: renter.into(),
        }
    }
}

/// Request to read a single booking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GetBookingRequest {
    /// Authenticated caller.
    pub principal: Principal,
    /// Booking to read.
    pub booking_id: Uuid,
}

/// Driving port for booking read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingQuery: Send + Sync {
    /// Read a single booking with its join context.
    ///
    /// Visible only to the renter who made it or the owner of its listing;
    /// every other principal receives `Forbidden` regardless of role.
    async fn get_booking(&self, request: GetBookingRequest)
    -> Result<BookingDetailsPayload, Error>;

    /// All bookings made by the authenticated renter, newest-first.
    async fn list_for_renter(
        &self,
        renter: UserId,
    ) -> Result<Vec<BookingDetailsPayload>, Error>;

    /// All bookings on the authenticated owner's listings, newest-first.
    async fn list_for_owner(&self, owner: UserId) -> Result<Vec<BookingDetailsPayload>, Error>;
}
