//! Listing store: owner-managed CRUD over rentable items.
//!
//! Deletion is blocked while any non-cancelled booking with a future end date
//! references the listing, so renters never lose a stay they already hold.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use uuid::Uuid;

use crate::domain::ports::{
    BookingRepository, BookingRepositoryError, CreateListingRequest, DeleteListingRequest,
    ListingCommand, ListingDraftPayload, ListingPayload, ListingQuery, ListingRepository,
    ListingRepositoryError, SearchListingsRequest, UpdateListingRequest,
};
use crate::domain::{Error, Listing, ListingDraft, Principal, RentalPeriod, Role, UserId};

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

fn map_booking_repo_error(error: BookingRepositoryError) -> Error {
    match error {
        BookingRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("booking store unavailable: {message}"))
        }
        other => Error::internal(format!("booking store error: {other}")),
    }
}

fn build_listing(
    id: Uuid,
    owner: UserId,
    draft: ListingDraftPayload,
) -> Result<Listing, Error> {
    let ListingDraftPayload {
        title,
        description,
        category,
        price_cents,
        images,
        location,
        available_from,
        available_until,
    } = draft;

    let availability = RentalPeriod::new(available_from, available_until)
        .map_err(|_| Error::invalid_range("availability window must end after it starts"))?;

    Listing::new(ListingDraft {
        id,
        owner,
        title,
        description,
        category,
        price_cents,
        images,
        location,
        availability,
    })
    .map_err(|err| Error::invalid_request(err.to_string()))
}

/// Listing service implementing the listing command and query ports.
#[derive(Clone)]
pub struct ListingService {
    listings: Arc<dyn ListingRepository>,
    bookings: Arc<dyn BookingRepository>,
    clock: Arc<dyn Clock>,
}

impl ListingService {
    /// Create a listing service over the listing and booking stores.
    pub fn new(
        listings: Arc<dyn ListingRepository>,
        bookings: Arc<dyn BookingRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            listings,
            bookings,
            clock,
        }
    }

    async fn find_owned(&self, listing_id: &Uuid, principal: Principal) -> Result<Listing, Error> {
        let listing = self
            .listings
            .find_by_id(listing_id)
            .await
            .map_err(map_listing_repo_error)?
            .ok_or_else(|| Error::not_found(format!("listing {listing_id} not found")))?;
        if listing.owner() != principal.id {
            return Err(Error::forbidden("only the owner can modify this listing"));
        }
        Ok(listing)
    }
}

#[async_trait]
impl ListingCommand for ListingService {
    async fn create_listing(
        &self,
        request: CreateListingRequest,
    ) -> Result<ListingPayload, Error> {
        let CreateListingRequest { principal, draft } = request;
        if principal.role != Role::Owner {
            return Err(Error::forbidden("only owners can create listings"));
        }

        let listing = build_listing(Uuid::new_v4(), principal.id, draft)?;
        self.listings
            .insert(&listing)
            .await
            .map_err(map_listing_repo_error)?;
        Ok(listing.into())
    }

    async fn update_listing(
        &self,
        request: UpdateListingRequest,
    ) -> Result<ListingPayload, Error> {
        let UpdateListingRequest {
            principal,
            listing_id,
            draft,
        } = request;

        let existing = self.find_owned(&listing_id, principal).await?;
        let updated = build_listing(existing.id(), existing.owner(), draft)?;
        self.listings
            .update(&updated)
            .await
            .map_err(map_listing_repo_error)?;
        Ok(updated.into())
    }

    async fn delete_listing(&self, request: DeleteListingRequest) -> Result<(), Error> {
        let DeleteListingRequest {
            principal,
            listing_id,
        } = request;

        let listing = self.find_owned(&listing_id, principal).await?;
        let blocked = self
            .bookings
            .has_blocking_bookings(&listing.id(), self.clock.utc())
            .await
            .map_err(map_booking_repo_error)?;
        if blocked {
            return Err(Error::conflict(
                "listing still has active bookings and cannot be deleted",
            ));
        }

        self.listings
            .delete(&listing.id())
            .await
            .map_err(map_listing_repo_error)
    }
}

#[async_trait]
impl ListingQuery for ListingService {
    async fn get_listing(&self, listing_id: Uuid) -> Result<ListingPayload, Error> {
        self.listings
            .find_by_id(&listing_id)
            .await
            .map_err(map_listing_repo_error)?
            .map(Into::into)
            .ok_or_else(|| Error::not_found(format!("listing {listing_id} not found")))
    }

    async fn search_listings(
        &self,
        request: SearchListingsRequest,
    ) -> Result<Vec<ListingPayload>, Error> {
        let listed = self
            .listings
            .search(&request.filter)
            .await
            .map_err(map_listing_repo_error)?;
        Ok(listed.into_iter().map(Into::into).collect())
    }

    async fn list_for_owner(&self, owner: UserId) -> Result<Vec<ListingPayload>, Error> {
        let listed = self
            .listings
            .list_for_owner(&owner)
            .await
            .map_err(map_listing_repo_error)?;
        Ok(listed.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
#[path = "listing_service_tests.rs"]
mod tests;
