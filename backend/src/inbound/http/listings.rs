//! Listing HTTP handlers.
//!
//! ```text
//! POST   /api/v1/listings
//! GET    /api/v1/listings
//! GET    /api/v1/listings/mine
//! GET    /api/v1/listings/{id}
//! PUT    /api/v1/listings/{id}
//! DELETE /api/v1/listings/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{
    CreateListingRequest, DeleteListingRequest, ListingDraftPayload, ListingFilter,
    ListingPayload, SearchListingsRequest, UpdateListingRequest,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_category, parse_optional_rfc3339_timestamp, parse_rfc3339_timestamp,
    parse_uuid,
};

/// Request payload for creating or replacing a listing.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingRequestBody {
    /// Short item title.
    pub title: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Item category: gear, vehicle, or room.
    #[schema(example = "gear")]
    pub category: String,
    /// Per-day price in minor currency units.
    pub price_cents: i64,
    /// Ordered image URLs.
    #[serde(default)]
    pub images: Vec<String>,
    /// Free-text location.
    #[serde(default)]
    pub location: String,
    /// Start of the bookable window.
    #[schema(format = "date-time")]
    pub available_from: String,
    /// End of the bookable window.
    #[schema(format = "date-time")]
    pub available_until: String,
}

/// Query parameters for searching listings.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct SearchListingsParams {
    /// Restrict to a single category.
    pub category: Option<String>,
    /// Case-insensitive substring match on the location.
    pub location: Option<String>,
    /// Lower bound on the per-day price.
    pub min_price_cents: Option<i64>,
    /// Upper bound on the per-day price.
    pub max_price_cents: Option<i64>,
    /// Listings must be available from this instant.
    pub available_from: Option<String>,
    /// Listings must remain available until this instant.
    pub available_until: Option<String>,
}

/// Response payload describing a listing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingBody {
    /// Listing identifier.
    #[schema(format = "uuid")]
    pub id: String,
    /// Owning user.
    #[schema(format = "uuid")]
    pub owner_id: String,
    /// Short item title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Item category.
    pub category: String,
    /// Per-day price in minor currency units.
    pub price_cents: i64,
    /// Ordered image URLs.
    pub images: Vec<String>,
    /// Free-text location.
    pub location: String,
    /// Start of the bookable window.
    #[schema(format = "date-time")]
    pub available_from: String,
    /// End of the bookable window.
    #[schema(format = "date-time")]
    pub available_until: String,
}

impl From<ListingPayload> for ListingBody {
    fn from(value: ListingPayload) -> Self {
        Self {
            id: value.id.to_string(),
            owner_id: value.owner_id.to_string(),
            title: value.title,
            description: value.description,
            category: value.category.to_string(),
            price_cents: value.price_cents,
            images: value.images,
            location: value.location,
            available_from: value.available_from.to_rfc3339(),
            available_until: value.available_until.to_rfc3339(),
        }
    }
}

fn parse_draft(body: ListingRequestBody) -> Result<ListingDraftPayload, crate::domain::Error> {
    let ListingRequestBody {
        title,
        description,
        category,
        price_cents,
        images,
        location,
        available_from,
        available_until,
    } = body;

    Ok(ListingDraftPayload {
        title,
        description,
        category: parse_category(&category, FieldName::new("category"))?,
        price_cents,
        images,
        location,
        available_from: parse_rfc3339_timestamp(&available_from, FieldName::new("availableFrom"))?,
        available_until: parse_rfc3339_timestamp(
            &available_until,
            FieldName::new("availableUntil"),
        )?,
    })
}

fn parse_filter(params: SearchListingsParams) -> Result<ListingFilter, crate::domain::Error> {
    let SearchListingsParams {
        category,
        location,
        min_price_cents,
        max_price_cents,
        available_from,
        available_until,
    } = params;

    Ok(ListingFilter {
        category: category
            .map(|raw| parse_category(&raw, FieldName::new("category")))
            .transpose()?,
        location,
        min_price_cents,
        max_price_cents,
        available_from: parse_optional_rfc3339_timestamp(
            available_from.as_deref(),
            FieldName::new("availableFrom"),
        )?,
        available_until: parse_optional_rfc3339_timestamp(
            available_until.as_deref(),
            FieldName::new("availableUntil"),
        )?,
    })
}

/// Create a listing owned by the authenticated user.
#[utoipa::path(
    post,
    path = "/api/v1/listings",
    request_body = ListingRequestBody,
    responses(
        (status = 200, description = "Listing created", body = ListingBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "createListing",
    security(("SessionCookie" = []))
)]
#[post("/listings")]
pub async fn create_listing(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ListingRequestBody>,
) -> ApiResult<web::Json<ListingBody>> {
    let principal = session.require_principal()?;
    let draft = parse_draft(payload.into_inner())?;
    let listing = state
        .listings
        .create_listing(CreateListingRequest { principal, draft })
        .await?;
    Ok(web::Json(listing.into()))
}

/// Search public listings.
#[utoipa::path(
    get,
    path = "/api/v1/listings",
    params(SearchListingsParams),
    responses(
        (status = 200, description = "Matching listings", body = [ListingBody]),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "searchListings"
)]
#[get("/listings")]
pub async fn search_listings(
    state: web::Data<HttpState>,
    params: web::Query<SearchListingsParams>,
) -> ApiResult<web::Json<Vec<ListingBody>>> {
    let filter = parse_filter(params.into_inner())?;
    let listed = state
        .listings_query
        .search_listings(SearchListingsRequest { filter })
        .await?;
    Ok(web::Json(listed.into_iter().map(Into::into).collect()))
}

/// List the authenticated owner's listings.
#[utoipa::path(
    get,
    path = "/api/v1/listings/mine",
    responses(
        (status = 200, description = "Own listings", body = [ListingBody]),
        (status = 401, description = "Unauthorized", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "listOwnListings",
    security(("SessionCookie" = []))
)]
#[get("/listings/mine")]
pub async fn list_own_listings(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<ListingBody>>> {
    let principal = session.require_principal()?;
    let listed = state.listings_query.list_for_owner(principal.id).await?;
    Ok(web::Json(listed.into_iter().map(Into::into).collect()))
}

/// Read a single listing.
#[utoipa::path(
    get,
    path = "/api/v1/listings/{id}",
    params(("id" = String, Path, format = "uuid", description = "Listing id")),
    responses(
        (status = 200, description = "The listing", body = ListingBody),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "getListing"
)]
#[get("/listings/{id}")]
pub async fn get_listing(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ListingBody>> {
    let listing_id = parse_uuid(&path.into_inner(), FieldName::new("id"))?;
    let listing = state.listings_query.get_listing(listing_id).await?;
    Ok(web::Json(listing.into()))
}

/// Replace a listing's fields.
#[utoipa::path(
    put,
    path = "/api/v1/listings/{id}",
    params(("id" = String, Path, format = "uuid", description = "Listing id")),
    request_body = ListingRequestBody,
    responses(
        (status = 200, description = "Listing updated", body = ListingBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "updateListing",
    security(("SessionCookie" = []))
)]
#[put("/listings/{id}")]
pub async fn update_listing(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ListingRequestBody>,
) -> ApiResult<web::Json<ListingBody>> {
    let principal = session.require_principal()?;
    let listing_id = parse_uuid(&path.into_inner(), FieldName::new("id"))?;
    let draft = parse_draft(payload.into_inner())?;
    let listing = state
        .listings
        .update_listing(UpdateListingRequest {
            principal,
            listing_id,
            draft,
        })
        .await?;
    Ok(web::Json(listing.into()))
}

/// Delete a listing with no live bookings.
#[utoipa::path(
    delete,
    path = "/api/v1/listings/{id}",
    params(("id" = String, Path, format = "uuid", description = "Listing id")),
    responses(
        (status = 204, description = "Listing deleted"),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Live bookings block deletion", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "deleteListing",
    security(("SessionCookie" = []))
)]
#[delete("/listings/{id}")]
pub async fn delete_listing(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let principal = session.require_principal()?;
    let listing_id = parse_uuid(&path.into_inner(), FieldName::new("id"))?;
    state
        .listings
        .delete_listing(DeleteListingRequest {
            principal,
            listing_id,
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
