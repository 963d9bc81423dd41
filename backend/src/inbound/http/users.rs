//! Login and identity HTTP handlers.
//!
//! ```text
//! POST /api/v1/login
//! GET  /api/v1/me
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{LoginRequest, UserPayload};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_role};

/// Request payload for logging in.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequestBody {
    /// Requested display name.
    pub display_name: String,
    /// Marketplace role: renter or owner.
    #[schema(example = "renter")]
    pub role: String,
}

/// Response payload describing the authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserBody {
    /// User identifier.
    #[schema(format = "uuid")]
    pub id: String,
    /// Display name shown to other users.
    pub display_name: String,
    /// Marketplace role.
    #[schema(example = "renter")]
    pub role: String,
}

impl From<UserPayload> for UserBody {
    fn from(value: UserPayload) -> Self {
        Self {
            id: value.id.to_string(),
            display_name: value.display_name,
            role: value.role.to_string(),
        }
    }
}

/// Log in with a display name and role, establishing the session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequestBody,
    responses(
        (status = 200, description = "Logged in", body = UserBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login"
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequestBody>,
) -> ApiResult<web::Json<UserBody>> {
    let LoginRequestBody { display_name, role } = payload.into_inner();
    let role = parse_role(&role, FieldName::new("role"))?;

    let user = state.login.login(LoginRequest { display_name, role }).await?;
    session.persist_principal(crate::domain::Principal {
        id: user.id,
        role: user.role,
    })?;

    Ok(web::Json(user.into()))
}

/// Read the authenticated user's own record.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Authenticated user", body = UserBody),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser",
    security(("SessionCookie" = []))
)]
#[get("/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserBody>> {
    let principal = session.require_principal()?;
    let user = state.login.current_user(principal.id).await?;
    Ok(web::Json(user.into()))
}
