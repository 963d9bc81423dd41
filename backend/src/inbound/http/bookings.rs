//! Booking HTTP handlers.
//!
//! ```text
//! POST  /api/v1/bookings
//! GET   /api/v1/bookings
//! GET   /api/v1/bookings/owner
//! GET   /api/v1/bookings/{id}
//! PATCH /api/v1/bookings/{id}/status
//! POST  /api/v1/bookings/{id}/cancellation
//! ```

use std::str::FromStr;

use actix_web::{get, patch, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::{
    BookingDetailsPayload, BookingPayload, CancelBookingRequest, CreateBookingRequest,
    GetBookingRequest, UpdateBookingStatusRequest,
};
use crate::domain::{BookingStatus, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_rfc3339_timestamp, parse_uuid};

/// Request payload for creating a booking.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequestBody {
    /// Listing to reserve.
    #[schema(format = "uuid")]
    pub listing_id: String,
    /// Stay start.
    #[schema(format = "date-time")]
    pub start_at: String,
    /// Stay end.
    #[schema(format = "date-time")]
    pub end_at: String,
    /// Client-computed total in minor currency units.
    pub total_cents: i64,
}

/// Request payload for the owner's status decision.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingStatusRequestBody {
    /// Requested state: confirmed or cancelled.
    #[schema(example = "confirmed")]
    pub status: String,
}

/// Request payload for a renter cancellation.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CancelBookingRequestBody {
    /// Required cancellation reason, surfaced to the owner.
    pub reason: String,
}

/// Response payload describing a booking.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingBody {
    /// Booking identifier.
    #[schema(format = "uuid")]
    pub id: String,
    /// Reserved listing.
    #[schema(format = "uuid")]
    pub listing_id: String,
    /// Requesting renter.
    #[schema(format = "uuid")]
    pub renter_id: String,
    /// Stay start.
    #[schema(format = "date-time")]
    pub start_at: String,
    /// Stay end.
    #[schema(format = "date-time")]
    pub end_at: String,
    /// Total in minor currency units.
    pub total_cents: i64,
    /// Effective lifecycle state at read time.
    #[schema(example = "pending")]
    pub status: String,
    /// Reason recorded on renter cancellation.
    pub cancellation_reason: Option<String>,
    /// Creation timestamp.
    #[schema(format = "date-time")]
    pub created_at: String,
}

impl From<BookingPayload> for BookingBody {
    fn from(value: BookingPayload) -> Self {
        Self {
            id: value.id.to_string(),
            listing_id: value.listing_id.to_string(),
            renter_id: value.renter_id.to_string(),
            start_at: value.start_at.to_rfc3339(),
            end_at: value.end_at.to_rfc3339(),
            total_cents: value.total_cents,
            status: value.status.to_string(),
            cancellation_reason: value.cancellation_reason,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// Listing summary attached to booking reads.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingListingBody {
    /// Listing identifier.
    #[schema(format = "uuid")]
    pub id: String,
    /// Listing title.
    pub title: String,
    /// Per-day price in minor currency units.
    pub price_cents: i64,
    /// Listing owner.
    #[schema(format = "uuid")]
    pub owner_id: String,
}

/// Renter summary attached to booking reads.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingRenterBody {
    /// User identifier.
    #[schema(format = "uuid")]
    pub id: String,
    /// Display name shown to other users.
    pub display_name: String,
}

/// Response payload for a booking with its join context.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetailsBody {
    /// The booking itself.
    pub booking: BookingBody,
    /// Summary of the reserved listing.
    pub listing: BookingListingBody,
    /// Summary of the requesting renter.
    pub renter: BookingRenterBody,
}

impl From<BookingDetailsPayload> for BookingDetailsBody {
    fn from(value: BookingDetailsPayload) -> Self {
        Self {
            booking: value.booking.into(),
            listing: BookingListingBody {
                id: value.listing.id.to_string(),
                title: value.listing.title,
                price_cents: value.listing.price_cents,
                owner_id: value.listing.owner_id.to_string(),
            },
            renter: BookingRenterBody {
                id: value.renter.id.to_string(),
                display_name: value.renter.display_name,
            },
        }
    }
}

fn parse_status(raw: &str) -> Result<BookingStatus, Error> {
    BookingStatus::from_str(raw).map_err(|_| {
        Error::invalid_request("status must be confirmed or cancelled").with_details(json!({
            "field": "status",
            "value": raw,
            "code": "invalid_status",
        }))
    })
}

/// Request a booking for a listing.
#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    request_body = CreateBookingRequestBody,
    responses(
        (status = 200, description = "Booking requested", body = BookingBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Listing not found", body = ErrorSchema),
        (status = 409, description = "Dates overlap an existing booking", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "createBooking",
    security(("SessionCookie" = []))
)]
#[post("/bookings")]
pub async fn create_booking(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateBookingRequestBody>,
) -> ApiResult<web::Json<BookingBody>> {
    let principal = session.require_principal()?;
    let CreateBookingRequestBody {
        listing_id,
        start_at,
        end_at,
        total_cents,
    } = payload.into_inner();

    let booking = state
        .bookings
        .create_booking(CreateBookingRequest {
            principal,
            listing_id: parse_uuid(&listing_id, FieldName::new("listingId"))?,
            start_at: parse_rfc3339_timestamp(&start_at, FieldName::new("startAt"))?,
            end_at: parse_rfc3339_timestamp(&end_at, FieldName::new("endAt"))?,
            total_cents,
        })
        .await?;
    Ok(web::Json(booking.into()))
}

/// List the authenticated renter's bookings.
#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    responses(
        (status = 200, description = "Own bookings", body = [BookingDetailsBody]),
        (status = 401, description = "Unauthorized", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "listRenterBookings",
    security(("SessionCookie" = []))
)]
#[get("/bookings")]
pub async fn list_renter_bookings(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<BookingDetailsBody>>> {
    let principal = session.require_principal()?;
    let listed = state.bookings_query.list_for_renter(principal.id).await?;
    Ok(web::Json(listed.into_iter().map(Into::into).collect()))
}

/// List bookings on the authenticated owner's listings.
#[utoipa::path(
    get,
    path = "/api/v1/bookings/owner",
    responses(
        (status = 200, description = "Bookings on own listings", body = [BookingDetailsBody]),
        (status = 401, description = "Unauthorized", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "listOwnerBookings",
    security(("SessionCookie" = []))
)]
#[get("/bookings/owner")]
pub async fn list_owner_bookings(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<BookingDetailsBody>>> {
    let principal = session.require_principal()?;
    let listed = state.bookings_query.list_for_owner(principal.id).await?;
    Ok(web::Json(listed.into_iter().map(Into::into).collect()))
}

/// Read a single booking; renter and listing owner only.
#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}",
    params(("id" = String, Path, format = "uuid", description = "Booking id")),
    responses(
        (status = 200, description = "The booking", body = BookingDetailsBody),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "getBooking",
    security(("SessionCookie" = []))
)]
#[get("/bookings/{id}")]
pub async fn get_booking(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<BookingDetailsBody>> {
    let principal = session.require_principal()?;
    let booking_id = parse_uuid(&path.into_inner(), FieldName::new("id"))?;
    let details = state
        .bookings_query
        .get_booking(GetBookingRequest {
            principal,
            booking_id,
        })
        .await?;
    Ok(web::Json(details.into()))
}

/// Owner decision on a pending booking.
#[utoipa::path(
    patch,
    path = "/api/v1/bookings/{id}/status",
    params(("id" = String, Path, format = "uuid", description = "Booking id")),
    request_body = UpdateBookingStatusRequestBody,
    responses(
        (status = 200, description = "Status updated", body = BookingBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Transition not permitted", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "updateBookingStatus",
    security(("SessionCookie" = []))
)]
#[patch("/bookings/{id}/status")]
pub async fn update_booking_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateBookingStatusRequestBody>,
) -> ApiResult<web::Json<BookingBody>> {
    let principal = session.require_principal()?;
    let booking_id = parse_uuid(&path.into_inner(), FieldName::new("id"))?;
    let status = parse_status(&payload.status)?;
    let booking = state
        .bookings
        .update_status(UpdateBookingStatusRequest {
            principal,
            booking_id,
            status,
        })
        .await?;
    Ok(web::Json(booking.into()))
}

/// Renter cancellation of a confirmed booking.
#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/cancellation",
    params(("id" = String, Path, format = "uuid", description = "Booking id")),
    request_body = CancelBookingRequestBody,
    responses(
        (status = 200, description = "Booking cancelled", body = BookingBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Cancellation rules violated", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "cancelBooking",
    security(("SessionCookie" = []))
)]
#[post("/bookings/{id}/cancellation")]
pub async fn cancel_booking(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CancelBookingRequestBody>,
) -> ApiResult<web::Json<BookingBody>> {
    let principal = session.require_principal()?;
    let booking_id = parse_uuid(&path.into_inner(), FieldName::new("id"))?;
    let booking = state
        .bookings
        .cancel_booking(CancelBookingRequest {
            principal,
            booking_id,
            reason: payload.into_inner().reason,
        })
        .await?;
    Ok(web::Json(booking.into()))
}

#[cfg(test)]
#[path = "bookings_tests.rs"]
mod tests;
