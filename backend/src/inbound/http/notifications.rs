//! Notification HTTP handlers.
//!
//! ```text
//! GET    /api/v1/notifications
//! PATCH  /api/v1/notifications/{id}/read
//! DELETE /api/v1/notifications/{id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{
    DeleteNotificationRequest, MarkNotificationReadRequest, NotificationPayload,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid};

/// Response payload describing a notification.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationBody {
    /// Notification identifier.
    #[schema(format = "uuid")]
    pub id: String,
    /// Recipient.
    #[schema(format = "uuid")]
    pub user_id: String,
    /// Event category: booking or message.
    #[schema(example = "booking")]
    pub kind: String,
    /// Human-readable notification text.
    pub message: String,
    /// Client route hint.
    pub link: String,
    /// Whether the recipient has read this notification.
    pub is_read: bool,
    /// Creation timestamp.
    #[schema(format = "date-time")]
    pub created_at: String,
}

impl From<NotificationPayload> for NotificationBody {
    fn from(value: NotificationPayload) -> Self {
        Self {
            id: value.id.to_string(),
            user_id: value.user_id.to_string(),
            kind: value.kind.to_string(),
            message: value.message,
            link: value.link,
            is_read: value.is_read,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// List the authenticated user's notifications, newest-first.
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    responses(
        (status = 200, description = "Own notifications", body = [NotificationBody]),
        (status = 401, description = "Unauthorized", body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "listNotifications",
    security(("SessionCookie" = []))
)]
#[get("/notifications")]
pub async fn list_notifications(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<NotificationBody>>> {
    let principal = session.require_principal()?;
    let listed = state
        .notifications_query
        .list_notifications(principal.id)
        .await?;
    Ok(web::Json(listed.into_iter().map(Into::into).collect()))
}

/// Mark one of the caller's notifications read.
#[utoipa::path(
    patch,
    path = "/api/v1/notifications/{id}/read",
    params(("id" = String, Path, format = "uuid", description = "Notification id")),
    responses(
        (status = 200, description = "Notification marked read", body = NotificationBody),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "markNotificationRead",
    security(("SessionCookie" = []))
)]
#[patch("/notifications/{id}/read")]
pub async fn mark_notification_read(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<NotificationBody>> {
    let principal = session.require_principal()?;
    let notification_id = parse_uuid(&path.into_inner(), FieldName::new("id"))?;
    let notification = state
        .notifications
        .mark_read(MarkNotificationReadRequest {
            principal,
            notification_id,
        })
        .await?;
    Ok(web::Json(notification.into()))
}

/// Delete one of the caller's notifications.
#[utoipa::path(
    delete,
    path = "/api/v1/notifications/{id}",
    params(("id" = String, Path, format = "uuid", description = "Notification id")),
    responses(
        (status = 204, description = "Notification deleted"),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "deleteNotification",
    security(("SessionCookie" = []))
)]
#[delete("/notifications/{id}")]
pub async fn delete_notification(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let principal = session.require_principal()?;
    let notification_id = parse_uuid(&path.into_inner(), FieldName::new("id"))?;
    state
        .notifications
        .delete(DeleteNotificationRequest {
            principal,
            notification_id,
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
