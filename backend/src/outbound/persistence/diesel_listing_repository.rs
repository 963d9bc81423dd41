//! PostgreSQL-backed `ListingRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{ListingFilter, ListingRepository, ListingRepositoryError};
use crate::domain::{Listing, ListingDraft, RentalPeriod, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{ListingChangeset, ListingRow, NewListingRow};
use super::pool::DbPool;
use super::schema::listings;

/// Diesel-backed implementation of the listing repository port.
#[derive(Clone)]
pub struct DieselListingRepository {
    pool: DbPool,
}

impl DieselListingRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_own_pool_error(error: super::pool::PoolError) -> ListingRepositoryError {
    map_pool_error(error, ListingRepositoryError::connection)
}

fn map_own_diesel_error(error: &diesel::result::Error) -> ListingRepositoryError {
    map_diesel_error(
        error,
        ListingRepositoryError::query,
        ListingRepositoryError::connection,
    )
}

/// Convert a database row into a validated domain listing.
fn row_to_listing(row: ListingRow) -> Result<Listing, ListingRepositoryError> {
    let ListingRow {
        id,
        owner_id,
        title,
        description,
        category,
        price_cents,
        images,
        location,
        available_from,
        available_until,
        created_at: _,
        updated_at: _,
    } = row;

    let category = category
        .parse()
        .map_err(|_| ListingRepositoryError::query("unknown listing category in row"))?;
    let availability = RentalPeriod::new(available_from, available_until)
        .map_err(|err| ListingRepositoryError::query(err.to_string()))?;

    Listing::new(ListingDraft {
        id,
        owner: UserId::from_uuid(owner_id),
        title,
        description,
        category,
        price_cents,
        images,
        location,
        availability,
    })
    .map_err(|err| ListingRepositoryError::query(err.to_string()))
}

fn rows_to_listings(rows: Vec<ListingRow>) -> Result<Vec<Listing>, ListingRepositoryError> {
    rows.into_iter().map(row_to_listing).collect()
}

#[async_trait]
impl ListingRepository for DieselListingRepository {
    async fn insert(&self, listing: &Listing) -> Result<(), ListingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_own_pool_error)?;

        let row = NewListingRow {
            id: listing.id(),
            owner_id: *listing.owner().as_uuid(),
            title: listing.title(),
            description: listing.description(),
            category: listing.category().as_str(),
            price_cents: listing.price_cents(),
            images: listing.images(),
            location: listing.location(),
            available_from: listing.availability().start_at(),
            available_until: listing.availability().end_at(),
        };
        diesel::insert_into(listings::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_own_diesel_error(&err))
    }

    async fn find_by_id(
        &self,
        listing_id: &Uuid,
    ) -> Result<Option<Listing>, ListingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_own_pool_error)?;

        let row = listings::table
            .find(listing_id)
            .select(ListingRow::as_select())
            .first::<ListingRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_own_diesel_error(&err))?;

        row.map(row_to_listing).transpose()
    }

    async fn search(&self, filter: &ListingFilter) -> Result<Vec<Listing>, ListingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_own_pool_error)?;

        let mut query = listings::table
            .select(ListingRow::as_select())
            .into_boxed();
        if let Some(category) = filter.category {
            query = query.filter(listings::category.eq(category.as_str().to_owned()));
        }
        if let Some(location) = &filter.location {
            query = query.filter(listings::location.ilike(format!("%{location}%")));
        }
        if let Some(min_price) = filter.min_price_cents {
            query = query.filter(listings::price_cents.ge(min_price));
        }
        if let Some(max_price) = filter.max_price_cents {
            query = query.filter(listings::price_cents.le(max_price));
        }
        if let Some(from) = filter.available_from {
            query = query.filter(listings::available_from.le(from));
        }
        if let Some(until) = filter.available_until {
            query = query.filter(listings::available_until.ge(until));
        }

        let rows: Vec<ListingRow> = query
            .order(listings::created_at.desc())
            .load(&mut conn)
            .await
            .map_err(|err| map_own_diesel_error(&err))?;

        rows_to_listings(rows)
    }

    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Listing>, ListingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_own_pool_error)?;

        let rows: Vec<ListingRow> = listings::table
            .filter(listings::owner_id.eq(owner.as_uuid()))
            .order(listings::created_at.desc())
            .select(ListingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_own_diesel_error(&err))?;

        rows_to_listings(rows)
    }

    async fn update(&self, listing: &Listing) -> Result<(), ListingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_own_pool_error)?;

        let changes = ListingChangeset {
            title: listing.title(),
            description: listing.description(),
            category: listing.category().as_str(),
            price_cents: listing.price_cents(),
            images: listing.images(),
            location: listing.location(),
            available_from: listing.availability().start_at(),
            available_until: listing.availability().end_at(),
        };
        diesel::update(listings::table.find(listing.id()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_own_diesel_error(&err))
    }

    async fn delete(&self, listing_id: &Uuid) -> Result<(), ListingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_own_pool_error)?;

        diesel::delete(listings::table.find(listing_id))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_own_diesel_error(&err))
    }
}
