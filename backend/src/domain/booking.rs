//! Booking aggregate and its status state machine.
//!
//! A booking reserves a listing for a closed rental period. Only `pending`,
//! `confirmed`, and `cancelled` are ever stored; `active` and `completed` are
//! derived from a confirmed booking's dates at read time, so a confirmed
//! booking whose period has begun is treated as terminal-in-progress without a
//! scheduled job mutating rows.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::period::{EmptyPeriodError, RentalPeriod};
use crate::domain::user::UserId;

/// Minimum lead time a renter must leave when cancelling a confirmed booking.
pub const CANCELLATION_CUTOFF: Duration = Duration::hours(24);

/// Validation errors raised by [`Booking::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingValidationError {
    /// The rental period is empty or reversed.
    EmptyPeriod,
    /// The total is zero or negative.
    NonPositiveTotal,
    /// The status string matches no known booking status.
    UnknownStatus,
}

impl fmt::Display for BookingValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPeriod => write!(f, "booking end date must be after its start date"),
            Self::NonPositiveTotal => write!(f, "booking total must be positive"),
            Self::UnknownStatus => write!(f, "unknown booking status"),
        }
    }
}

impl std::error::Error for BookingValidationError {}

impl From<EmptyPeriodError> for BookingValidationError {
    fn from(_: EmptyPeriodError) -> Self {
        Self::EmptyPeriod
    }
}

/// Lifecycle state of a booking.
///
/// `Active` and `Completed` are derived, never stored; see
/// [`Booking::effective_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Awaiting the owner's decision.
    Pending,
    /// Accepted by the owner; the stay has not started.
    Confirmed,
    /// Derived: confirmed and the period has started but not ended.
    Active,
    /// Derived: confirmed and the period has ended.
    Completed,
    /// Declined by the owner or cancelled by the renter. Terminal.
    Cancelled,
}

impl BookingStatus {
    /// Stable string form used in persistence and the API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether no further transition is permitted out of this state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = BookingValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(BookingValidationError::UnknownStatus),
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unvalidated booking fields used to construct a [`Booking`].
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDraft {
    /// Stable booking identifier.
    pub id: Uuid,
    /// Reserved listing.
    pub listing_id: Uuid,
    /// Requesting renter.
    pub renter: UserId,
    /// Reserved period.
    pub period: RentalPeriod,
    /// Total in minor currency units.
    pub total_cents: i64,
    /// Stored lifecycle state.
    pub status: BookingStatus,
    /// Reason recorded on renter cancellation.
    pub cancellation_reason: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A reservation of a listing by a renter for a rental period.
///
/// ## Invariants
/// - `total_cents` is positive.
/// - The period is non-empty (`start < end`).
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    id: Uuid,
    listing_id: Uuid,
    renter: UserId,
    period: RentalPeriod,
    total_cents: i64,
    status: BookingStatus,
    cancellation_reason: Option<String>,
    created_at: DateTime<Utc>,
}

impl Booking {
    /// Validate and construct a booking from a draft.
    pub fn new(draft: BookingDraft) -> Result<Self, BookingValidationError> {
        let BookingDraft {
            id,
            listing_id,
            renter,
            period,
            total_cents,
            status,
            cancellation_reason,
            created_at,
        } = draft;

        if total_cents <= 0 {
            return Err(BookingValidationError::NonPositiveTotal);
        }

        Ok(Self {
            id,
            listing_id,
            renter,
            period,
            total_cents,
            status,
            cancellation_reason,
            created_at,
        })
    }

    /// Stable booking identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Reserved listing.
    #[must_use]
    pub const fn listing_id(&self) -> Uuid {
        self.listing_id
    }

    /// Requesting renter.
    #[must_use]
    pub const fn renter(&self) -> UserId {
        self.renter
    }

    /// Reserved period.
    #[must_use]
    pub const fn period(&self) -> RentalPeriod {
        self.period
    }

    /// Total in minor currency units.
    #[must_use]
    pub const fn total_cents(&self) -> i64 {
        self.total_cents
    }

    /// Stored lifecycle state, ignoring the clock.
    #[must_use]
    pub const fn stored_status(&self) -> BookingStatus {
        self.status
    }

    /// Reason recorded on renter cancellation.
    #[must_use]
    pub fn cancellation_reason(&self) -> Option<&str> {
        self.cancellation_reason.as_deref()
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Lifecycle state as observed at `now`.
    ///
    /// Confirmed bookings become `Active` once their period starts and
    /// `Completed` once it ends; all other stored states pass through.
    #[must_use]
    pub fn effective_status(&self, now: DateTime<Utc>) -> BookingStatus {
        match self.status {
            BookingStatus::Confirmed if now >= self.period.end_at() => BookingStatus::Completed,
            BookingStatus::Confirmed if now >= self.period.start_at() => BookingStatus::Active,
            other => other,
        }
    }

    /// Whether the owner may move this booking to `requested` at `now`.
    ///
    /// Owners only arbitrate pending requests: `pending -> confirmed` and
    /// `pending -> cancelled`. Every other combination is rejected, including
    /// anything out of the derived `active`/`completed` states.
    #[must_use]
    pub fn owner_may_transition(&self, requested: BookingStatus, now: DateTime<Utc>) -> bool {
        self.effective_status(now) == BookingStatus::Pending
            && matches!(
                requested,
                BookingStatus::Confirmed | BookingStatus::Cancelled
            )
    }

    /// Why a renter cancellation is not permitted at `now`, if it is not.
    #[must_use]
    pub fn cancellation_blocker(&self, now: DateTime<Utc>) -> Option<CancellationBlocker> {
        if self.effective_status(now) != BookingStatus::Confirmed {
            return Some(CancellationBlocker::NotConfirmed);
        }
        if self.period.start_at() - now <= CANCELLATION_CUTOFF {
            return Some(CancellationBlocker::CutoffPassed);
        }
        None
    }

    /// Copy of this booking moved to `status`.
    #[must_use]
    pub fn with_status(mut self, status: BookingStatus) -> Self {
        self.status = status;
        self
    }

    /// Copy of this booking cancelled with the renter's reason.
    #[must_use]
    pub fn cancelled_with_reason(mut self, reason: impl Into<String>) -> Self {
        self.status = BookingStatus::Cancelled;
        self.cancellation_reason = Some(reason.into());
        self
    }
}

/// Why a renter cancellation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancellationBlocker {
    /// Only confirmed bookings that have not started can be cancelled.
    NotConfirmed,
    /// Less than the cancellation cutoff remains before the stay starts.
    CutoffPassed,
}

impl fmt::Display for CancellationBlocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConfirmed => write!(f, "only confirmed bookings can be cancelled"),
            Self::CutoffPassed => write!(
                f,
                "bookings can only be cancelled more than 24 hours before they start"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    //! State machine coverage: derived states, owner transitions, and the
    //! renter cancellation window.

    use chrono::TimeZone;
    use rstest::rstest;

    use super::*;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, hour, 0, 0).single().expect("valid timestamp")
    }

    fn booking(status: BookingStatus) -> Booking {
        Booking::new(BookingDraft {
            id: Uuid::new_v4(),
            listing_id: Uuid::new_v4(),
            renter: UserId::random(),
            period: RentalPeriod::new(at(10, 12), at(14, 12)).expect("valid period"),
            total_cents: 6_000,
            status,
            cancellation_reason: None,
            created_at: at(1, 0),
        })
        .expect("valid booking")
    }

    #[test]
    fn rejects_non_positive_total() {
        let draft = BookingDraft {
            total_cents: 0,
            ..to_draft(&booking(BookingStatus::Pending))
        };
        assert_eq!(
            Booking::new(draft).expect_err("invalid total"),
            BookingValidationError::NonPositiveTotal
        );
    }

    fn to_draft(b: &Booking) -> BookingDraft {
        BookingDraft {
            id: b.id(),
            listing_id: b.listing_id(),
            renter: b.renter(),
            period: b.period(),
            total_cents: b.total_cents(),
            status: b.stored_status(),
            cancellation_reason: None,
            created_at: b.created_at(),
        }
    }

    #[rstest]
    // before the stay starts, stored status passes through
    #[case(BookingStatus::Confirmed, at(9, 0), BookingStatus::Confirmed)]
    // during the stay a confirmed booking reads as active
    #[case(BookingStatus::Confirmed, at(12, 0), BookingStatus::Active)]
    // after the stay it reads as completed
    #[case(BookingStatus::Confirmed, at(15, 0), BookingStatus::Completed)]
    // pending and cancelled never derive
    #[case(BookingStatus::Pending, at(12, 0), BookingStatus::Pending)]
    #[case(BookingStatus::Cancelled, at(15, 0), BookingStatus::Cancelled)]
    fn effective_status_derives_from_dates(
        #[case] stored: BookingStatus,
        #[case] now: DateTime<Utc>,
        #[case] expected: BookingStatus,
    ) {
        assert_eq!(booking(stored).effective_status(now), expected);
    }

    #[rstest]
    #[case(BookingStatus::Confirmed)]
    #[case(BookingStatus::Cancelled)]
    fn owner_arbitrates_pending_requests(#[case] requested: BookingStatus) {
        assert!(booking(BookingStatus::Pending).owner_may_transition(requested, at(9, 0)));
    }

    #[rstest]
    // pending cannot skip ahead
    #[case(BookingStatus::Pending, BookingStatus::Completed)]
    #[case(BookingStatus::Pending, BookingStatus::Active)]
    #[case(BookingStatus::Pending, BookingStatus::Pending)]
    // terminal and derived states reject everything
    #[case(BookingStatus::Cancelled, BookingStatus::Confirmed)]
    #[case(BookingStatus::Cancelled, BookingStatus::Pending)]
    #[case(BookingStatus::Confirmed, BookingStatus::Cancelled)]
    fn owner_transitions_reject_everything_else(
        #[case] stored: BookingStatus,
        #[case] requested: BookingStatus,
    ) {
        assert!(!booking(stored).owner_may_transition(requested, at(9, 0)));
    }

    #[test]
    fn owner_cannot_transition_once_stay_started() {
        // stored confirmed, effectively active
        let b = booking(BookingStatus::Confirmed);
        assert!(!b.owner_may_transition(BookingStatus::Cancelled, at(12, 0)));
    }

    #[test]
    fn renter_can_cancel_with_enough_lead_time() {
        // stay starts 2024-06-10 12:00; 30 hours before is 2024-06-09 06:00
        let b = booking(BookingStatus::Confirmed);
        assert_eq!(b.cancellation_blocker(at(9, 6)), None);
    }

    #[test]
    fn renter_cannot_cancel_within_cutoff() {
        // 10 hours before the start
        let b = booking(BookingStatus::Confirmed);
        assert_eq!(
            b.cancellation_blocker(at(10, 2)),
            Some(CancellationBlocker::CutoffPassed)
        );
    }

    #[rstest]
    #[case(BookingStatus::Pending)]
    #[case(BookingStatus::Cancelled)]
    fn renter_cannot_cancel_unconfirmed_bookings(#[case] stored: BookingStatus) {
        let b = booking(stored);
        assert_eq!(
            b.cancellation_blocker(at(1, 0)),
            Some(CancellationBlocker::NotConfirmed)
        );
    }

    #[test]
    fn cancellation_stores_the_reason() {
        let b = booking(BookingStatus::Confirmed).cancelled_with_reason("route changed");
        assert_eq!(b.stored_status(), BookingStatus::Cancelled);
        assert_eq!(b.cancellation_reason(), Some("route changed"));
    }

    #[rstest]
    #[case(BookingStatus::Cancelled, true)]
    #[case(BookingStatus::Completed, true)]
    #[case(BookingStatus::Pending, false)]
    #[case(BookingStatus::Confirmed, false)]
    #[case(BookingStatus::Active, false)]
    fn terminal_states(#[case] status: BookingStatus, #[case] expected: bool) {
        assert_eq!(status.is_terminal(), expected);
    }
}
