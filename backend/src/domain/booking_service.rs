//! Booking engine: validates and creates bookings, enforces the non-overlap
//! invariant, and drives status transitions.
//!
//! Notifications are dispatched after the primary mutation commits and are
//! fire-and-forget: a failed dispatch is logged and never rolls back or fails
//! the booking operation.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::{
    BookingCommand, BookingDetails, BookingDetailsPayload, BookingPayload, BookingQuery,
    BookingRepository, BookingRepositoryError, CancelBookingRequest, CreateBookingRequest,
    GetBookingRequest, ListingRepository, ListingRepositoryError, NotificationDispatch,
    UpdateBookingStatusRequest,
};
use crate::domain::{
    Booking, BookingDraft, BookingStatus, Error, NotificationKind, RentalPeriod, Role, UserId,
};

/// Client route for the owner's booking inbox, used in notification links.
const OWNER_BOOKINGS_LINK: &str = "/bookings/owner";
/// Client route for the renter's bookings page, used in notification links.
const RENTER_BOOKINGS_LINK: &str = "/bookings";

fn map_booking_repo_error(error: BookingRepositoryError) -> Error {
    match error {
        BookingRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("booking store unavailable: {message}"))
        }
        BookingRepositoryError::Query { message } => {
            Error::internal(format!("booking store error: {message}"))
        }
        BookingRepositoryError::Overlap => {
            Error::conflict("this listing is already booked for the selected dates")
        }
    }
}

fn map_listing_repo_error(error: ListingRepositoryError) -> Error {
    match error {
        ListingRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("listing store unavailable: {message}"))
        }
        ListingRepositoryError::Query { message } => {
            Error::internal(format!("listing store error: {message}"))
        }
    }
}

/// Booking engine implementing the booking command and query driving ports.
#[derive(Clone)]
pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
    listings: Arc<dyn ListingRepository>,
    dispatcher: Arc<dyn NotificationDispatch>,
    clock: Arc<dyn Clock>,
}

impl BookingService {
    /// Create a booking engine over its stores, dispatcher, and clock.
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        listings: Arc<dyn ListingRepository>,
        dispatcher: Arc<dyn NotificationDispatch>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            bookings,
            listings,
            dispatcher,
            clock,
        }
    }

    async fn find_details(&self, booking_id: &Uuid) -> Result<BookingDetails, Error> {
        self.bookings
            .find_detailed(booking_id)
            .await
            .map_err(map_booking_repo_error)?
            .ok_or_else(|| Error::not_found(format!("booking {booking_id} not found")))
    }

    /// Record a notification, logging instead of propagating failures.
    async fn notify_quietly(&self, user: UserId, message: String, link: &str) {
        if let Err(error) = self
            .dispatcher
            .notify(user, NotificationKind::Booking, message, link.to_owned())
            .await
        {
            warn!(%error, recipient = %user, "booking notification dispatch failed");
        }
    }
}

#[async_trait]
impl BookingCommand for BookingService {
    async fn create_booking(&self, request: CreateBookingRequest) -> Result<BookingPayload, Error> {
        let CreateBookingRequest {
            principal,
            listing_id,
            start_at,
            end_at,
            total_cents,
        } = request;

        if principal.role != Role::Renter {
            return Err(Error::forbidden("only renters can request bookings"));
        }

        let listing = self
            .listings
            .find_by_id(&listing_id)
            .await
            .map_err(map_listing_repo_error)?
            .ok_or_else(|| Error::not_found(format!("listing {listing_id} not found")))?;

        if listing.owner() == principal.id {
            return Err(Error::forbidden("owners cannot book their own listing"));
        }

        let period = RentalPeriod::new(start_at, end_at)
            .map_err(|_| Error::invalid_range("end date must be after the start date"))?;

        let now = self.clock.utc();
        if period.start_at() < now {
            return Err(Error::invalid_request("booking cannot start in the past"));
        }
        if !listing.availability().contains(&period) {
            return Err(Error::invalid_request(
                "requested dates fall outside the listing's availability window",
            ));
        }

        let expected_cents = listing.quote_cents(&period);
        if total_cents != expected_cents {
            return Err(
                Error::invalid_request("submitted total does not match the listing price")
                    .with_details(json!({
                        "expectedTotalCents": expected_cents,
                        "submittedTotalCents": total_cents,
                    })),
            );
        }

        let booking = Booking::new(BookingDraft {
            id: Uuid::new_v4(),
            listing_id,
            renter: principal.id,
            period,
            total_cents,
            status: BookingStatus::Pending,
            cancellation_reason: None,
            created_at: now,
        })
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        self.bookings
            .insert_if_vacant(&booking)
            .await
            .map_err(map_booking_repo_error)?;

        self.notify_quietly(
            listing.owner(),
            format!("New booking request for \"{}\"", listing.title()),
            OWNER_BOOKINGS_LINK,
        )
        .await;

        Ok(BookingPayload::observed_at(&booking, now))
    }

    async fn update_status(
        &self,
        request: UpdateBookingStatusRequest,
    ) -> Result<BookingPayload, Error> {
        let UpdateBookingStatusRequest {
            principal,
            booking_id,
            status,
        } = request;

        let details = self.find_details(&booking_id).await?;
        if details.listing.owner_id != principal.id {
            return Err(Error::forbidden(
                "only the listing owner can update this booking",
            ));
        }

        let now = self.clock.utc();
        let booking = details.booking;
        if !booking.owner_may_transition(status, now) {
            return Err(Error::conflict(format!(
                "cannot move booking from {} to {status}",
                booking.effective_status(now),
            )));
        }

        let updated = booking.with_status(status);
        self.bookings
            .update(&updated)
            .await
            .map_err(map_booking_repo_error)?;

        let outcome = match status {
            BookingStatus::Confirmed => "confirmed",
            _ => "declined",
        };
        self.notify_quietly(
            updated.renter(),
            format!(
                "Your booking for \"{}\" was {outcome}",
                details.listing.title
            ),
            RENTER_BOOKINGS_LINK,
        )
        .await;

        Ok(BookingPayload::observed_at(&updated, now))
    }

    async fn cancel_booking(&self, request: CancelBookingRequest) -> Result<BookingPayload, Error> {
        let CancelBookingRequest {
            principal,
            booking_id,
            reason,
        } = request;

        if reason.trim().is_empty() {
            return Err(Error::invalid_request("a cancellation reason is required"));
        }

        let details = self.find_details(&booking_id).await?;
        let booking = details.booking;
        if booking.renter() != principal.id {
            return Err(Error::forbidden(
                "only the renter who made this booking can cancel it",
            ));
        }

        let now = self.clock.utc();
        if let Some(blocker) = booking.cancellation_blocker(now) {
            return Err(Error::not_cancellable(blocker.to_string()));
        }

        let cancelled = booking.cancelled_with_reason(reason.trim());
        self.bookings
            .update(&cancelled)
            .await
            .map_err(map_booking_repo_error)?;

        self.notify_quietly(
            details.listing.owner_id,
            format!(
                "Booking for \"{}\" was cancelled by the renter: {}",
                details.listing.title,
                reason.trim(),
            ),
            OWNER_BOOKINGS_LINK,
        )
        .await;

        Ok(BookingPayload::observed_at(&cancelled, now))
    }
}

#[async_trait]
impl BookingQuery for BookingService {
    async fn get_booking(
        &self,
        request: GetBookingRequest,
    ) -> Result<BookingDetailsPayload, Error> {
        let details = self.find_details(&request.booking_id).await?;
        let caller = request.principal.id;
        let is_renter = details.booking.renter() == caller;
        let is_owner = details.listing.owner_id == caller;
        if !is_renter && !is_owner {
            return Err(Error::forbidden(
                "you do not have permission to view this booking",
            ));
        }
        Ok(BookingDetailsPayload::observed_at(details, self.clock.utc()))
    }

    async fn list_for_renter(&self, renter: UserId) -> Result<Vec<BookingDetailsPayload>, Error> {
        let now = self.clock.utc();
        let listed = self
            .bookings
            .list_for_renter(&renter)
            .await
            .map_err(map_booking_repo_error)?;
        Ok(listed
            .into_iter()
            .map(|details| BookingDetailsPayload::observed_at(details, now))
            .collect())
    }

    async fn list_for_owner(&self, owner: UserId) -> Result<Vec<BookingDetailsPayload>, Error> {
        let now = self.clock.utc();
        let listed = self
            .bookings
            .list_for_owner(&owner)
            .await
            .map_err(map_booking_repo_error)?;
        Ok(listed
            .into_iter()
            .map(|details| BookingDetailsPayload::observed_at(details, now))
            .collect())
    }
}

#[cfg(test)]
#[path = "booking_service_tests.rs"]
mod tests;
