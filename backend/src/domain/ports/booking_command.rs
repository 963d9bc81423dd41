//! Driving port for booking mutations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::ports::booking_query::BookingPayload;
use crate::domain::{BookingStatus, Error, Principal};

/// Request to reserve a listing for a date range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreateBookingRequest {
    /// Authenticated renter.
    pub principal: Principal,
    /// Listing to reserve.
    pub listing_id: Uuid,
    /// Stay start.
    pub start_at: DateTime<Utc>,
    /// Stay end.
    pub end_at: DateTime<Utc>,
    /// Client-computed total in minor currency units; the engine recomputes
    /// and rejects mismatches.
    pub total_cents: i64,
}

/// Request by the listing owner to arbitrate a pending booking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpdateBookingStatusRequest {
    /// Authenticated owner.
    pub principal: Principal,
    /// Booking to transition.
    pub booking_id: Uuid,
    /// Requested state: `confirmed` or `cancelled`.
    pub status: BookingStatus,
}

/// Request by the renter to cancel a confirmed booking.
#[derive(Debug, Clone, PartialEq)]
pub struct CancelBookingRequest {
    /// Authenticated renter.
    pub principal: Principal,
    /// Booking to cancel.
    pub booking_id: Uuid,
    /// Required cancellation reason, surfaced to the owner.
    pub reason: String,
}

/// Driving port for booking write operations.
///
/// Booking creation is not idempotent; duplicate submissions must be
/// deduplicated by the caller. Overlap conflicts and invalid transitions are
/// reported as errors and never retried here.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingCommand: Send + Sync {
    /// Create a pending booking after validating dates, price, and overlap.
    ///
    /// On success exactly one `booking` notification is dispatched to the
    /// listing owner; a failed dispatch is logged and never rolls back the
    /// booking.
    async fn create_booking(&self, request: CreateBookingRequest)
    -> Result<BookingPayload, Error>;

    /// Owner-only transition of a pending booking to confirmed or cancelled.
    /// Notifies the renter of the outcome.
    async fn update_status(
        &self,
        request: UpdateBookingStatusRequest,
    ) -> Result<BookingPayload, Error>;

    /// Renter-initiated cancellation under the 24-hour rule. Surfaces the
    /// reason to the owner.
    async fn cancel_booking(&self, request: CancelBookingRequest)
    -> Result<BookingPayload, Error>;
}
