//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST path plus the schema wrappers that keep
//! domain types free of utoipa derives. The generated specification backs
//! Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Epic Journey Rentals backend API",
        description = "Listings, bookings, notifications, and chat for the rental marketplace."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::current_user,
        crate::inbound::http::listings::create_listing,
        crate::inbound::http::listings::search_listings,
        crate::inbound::http::listings::list_own_listings,
        crate::inbound::http::listings::get_listing,
        crate::inbound::http::listings::update_listing,
        crate::inbound::http::listings::delete_listing,
        crate::inbound::http::bookings::create_booking,
        crate::inbound::http::bookings::list_renter_bookings,
        crate::inbound::http::bookings::list_owner_bookings,
        crate::inbound::http::bookings::get_booking,
        crate::inbound::http::bookings::update_booking_status,
        crate::inbound::http::bookings::cancel_booking,
        crate::inbound::http::notifications::list_notifications,
        crate::inbound::http::notifications::mark_notification_read,
        crate::inbound::http::notifications::delete_notification,
        crate::inbound::http::messages::send_message,
        crate::inbound::http::messages::get_conversation,
        crate::inbound::http::messages::get_inbox,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(ErrorSchema, ErrorCodeSchema))
)]
pub struct ApiDoc;
