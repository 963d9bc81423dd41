//! PostgreSQL-backed `BookingRepository` implementation using Diesel ORM.
//!
//! The overlap check-then-insert runs inside a single transaction that first
//! takes a per-listing advisory lock, serialising concurrent booking attempts
//! for the same listing. The schema's GiST exclusion constraint
//! (`bookings_no_overlap`) backs the same invariant at the storage level, so
//! even a write that bypasses this repository cannot produce an overlap.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{
    BookingDetails, BookingRepository, BookingRepositoryError, ListingSummary, UserSummary,
};
use crate::domain::{Booking, BookingDraft, BookingStatus, RentalPeriod, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{BookingRow, BookingStatusChangeset, NewBookingRow};
use super::pool::DbPool;
use super::schema::{bookings, listings, users};

/// Name of the GiST exclusion constraint guarding booking overlap.
const OVERLAP_CONSTRAINT: &str = "bookings_no_overlap";

/// Diesel-backed implementation of the booking repository port.
#[derive(Clone)]
pub struct DieselBookingRepository {
    pool: DbPool,
}

impl DieselBookingRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_own_pool_error(error: super::pool::PoolError) -> BookingRepositoryError {
    map_pool_error(error, BookingRepositoryError::connection)
}

fn map_own_diesel_error(error: &diesel::result::Error) -> BookingRepositoryError {
    map_diesel_error(
        error,
        BookingRepositoryError::query,
        BookingRepositoryError::connection,
    )
}

/// Advisory lock key derived from the listing id.
///
/// The first eight bytes of the UUID are stable across processes, which is
/// all the per-listing serialisation needs.
fn listing_lock_key(listing_id: &Uuid) -> i64 {
    let mut key = [0_u8; 8];
    key.copy_from_slice(&listing_id.as_bytes()[..8]);
    i64::from_be_bytes(key)
}

/// Transaction-internal error distinguishing overlap from Diesel failures.
#[derive(Debug)]
enum InsertOutcome {
    Overlap,
    Diesel(diesel::result::Error),
}

impl From<diesel::result::Error> for InsertOutcome {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

/// Whether a database error is the exclusion constraint rejecting an overlap.
fn is_overlap_violation(error: &diesel::result::Error) -> bool {
    match error {
        diesel::result::Error::DatabaseError(_, info) => {
            info.constraint_name() == Some(OVERLAP_CONSTRAINT)
        }
        _ => false,
    }
}

fn new_booking_row(booking: &Booking) -> NewBookingRow {
    NewBookingRow {
        id: booking.id(),
        listing_id: booking.listing_id(),
        renter_id: *booking.renter().as_uuid(),
        start_at: booking.period().start_at(),
        end_at: booking.period().end_at(),
        total_cents: booking.total_cents(),
        status: booking.stored_status().as_str().to_owned(),
        created_at: booking.created_at(),
    }
}

/// Convert a database row into a validated domain booking.
fn row_to_booking(row: BookingRow) -> Result<Booking, BookingRepositoryError> {
    let BookingRow {
        id,
        listing_id,
        renter_id,
        start_at,
        end_at,
        total_cents,
        status,
        cancellation_reason,
        created_at,
        updated_at: _,
    } = row;

    let status: BookingStatus = status
        .parse()
        .map_err(|_| BookingRepositoryError::query("unknown booking status in row"))?;
    let period = RentalPeriod::new(start_at, end_at)
        .map_err(|err| BookingRepositoryError::query(err.to_string()))?;

    Booking::new(BookingDraft {
        id,
        listing_id,
        renter: UserId::from_uuid(renter_id),
        period,
        total_cents,
        status,
        cancellation_reason,
        created_at,
    })
    .map_err(|err| BookingRepositoryError::query(err.to_string()))
}

type JoinedRow = (BookingRow, (Uuid, String, i64, Uuid), String);

fn row_to_details(row: JoinedRow) -> Result<BookingDetails, BookingRepositoryError> {
    let (booking_row, (listing_id, title, price_cents, owner_id), renter_name) = row;
    let renter_id = booking_row.renter_id;
    Ok(BookingDetails {
        booking: row_to_booking(booking_row)?,
        listing: ListingSummary {
            id: listing_id,
            title,
            price_cents,
            owner_id: UserId::from_uuid(owner_id),
        },
        renter: UserSummary {
            id: UserId::from_uuid(renter_id),
            display_name: renter_name,
        },
    })
}

/// Joined select attaching listing and renter summaries to a booking row.
macro_rules! detailed_select {
    () => {
        bookings::table
            .inner_join(listings::table)
            .inner_join(users::table)
            .select((
                BookingRow::as_select(),
                (
                    listings::id,
                    listings::title,
                    listings::price_cents,
                    listings::owner_id,
                ),
                users::display_name,
            ))
    };
}

#[async_trait]
impl BookingRepository for DieselBookingRepository {
    async fn insert_if_vacant(&self, booking: &Booking) -> Result<(), BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_own_pool_error)?;
        let row = new_booking_row(booking);
        let listing_id = booking.listing_id();
        let start_at = booking.period().start_at();
        let end_at = booking.period().end_at();

        let outcome = conn
            .transaction::<_, InsertOutcome, _>(|conn| {
                async move {
                    diesel::sql_query("SELECT pg_advisory_xact_lock($1)")
                        .bind::<BigInt, _>(listing_lock_key(&listing_id))
                        .execute(conn)
                        .await?;

                    let conflicting: i64 = bookings::table
                        .filter(bookings::listing_id.eq(listing_id))
                        .filter(bookings::status.ne(BookingStatus::Cancelled.as_str()))
                        .filter(bookings::start_at.le(end_at))
                        .filter(bookings::end_at.ge(start_at))
                        .count()
                        .get_result(conn)
                        .await?;
                    if conflicting > 0 {
                        return Err(InsertOutcome::Overlap);
                    }

                    diesel::insert_into(bookings::table)
                        .values(&row)
                        .execute(conn)
                        .await?;
                    Ok(())
                }
                .scope_boxed()
            })
            .await;

        match outcome {
            Ok(()) => Ok(()),
            Err(InsertOutcome::Overlap) => Err(BookingRepositoryError::Overlap),
            Err(InsertOutcome::Diesel(error)) if is_overlap_violation(&error) => {
                Err(BookingRepositoryError::Overlap)
            }
            Err(InsertOutcome::Diesel(error)) => Err(map_own_diesel_error(&error)),
        }
    }

    async fn find_detailed(
        &self,
        booking_id: &Uuid,
    ) -> Result<Option<BookingDetails>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_own_pool_error)?;

        let row: Option<JoinedRow> = detailed_select!()
            .filter(bookings::id.eq(booking_id))
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_own_diesel_error(&err))?;

        row.map(row_to_details).transpose()
    }

    async fn list_for_renter(
        &self,
        renter: &UserId,
    ) -> Result<Vec<BookingDetails>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_own_pool_error)?;

        let rows: Vec<JoinedRow> = detailed_select!()
            .filter(bookings::renter_id.eq(renter.as_uuid()))
            .order(bookings::created_at.desc())
            .load(&mut conn)
            .await
            .map_err(|err| map_own_diesel_error(&err))?;

        rows.into_iter().map(row_to_details).collect()
    }

    async fn list_for_owner(
        &self,
        owner: &UserId,
    ) -> Result<Vec<BookingDetails>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_own_pool_error)?;

        let rows: Vec<JoinedRow> = detailed_select!()
            .filter(listings::owner_id.eq(owner.as_uuid()))
            .order(bookings::created_at.desc())
            .load(&mut conn)
            .await
            .map_err(|err| map_own_diesel_error(&err))?;

        rows.into_iter().map(row_to_details).collect()
    }

    async fn update(&self, booking: &Booking) -> Result<(), BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_own_pool_error)?;

        let changes = BookingStatusChangeset {
            status: booking.stored_status().as_str(),
            cancellation_reason: booking.cancellation_reason(),
        };
        diesel::update(bookings::table.find(booking.id()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_own_diesel_error(&err))
    }

    async fn has_blocking_bookings(
        &self,
        listing_id: &Uuid,
        reference: DateTime<Utc>,
    ) -> Result<bool, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_own_pool_error)?;

        let blocking: i64 = bookings::table
            .filter(bookings::listing_id.eq(listing_id))
            .filter(bookings::status.ne(BookingStatus::Cancelled.as_str()))
            .filter(bookings::end_at.ge(reference))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(|err| map_own_diesel_error(&err))?;
        Ok(blocking > 0)
    }
}
