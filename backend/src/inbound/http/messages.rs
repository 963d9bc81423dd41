//! Messaging HTTP handlers.
//!
//! ```text
//! POST /api/v1/messages
//! GET  /api/v1/messages/{otherUserId}
//! GET  /api/v1/inbox
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Message;
use crate::domain::ports::SendMessageRequest;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_user_id};

/// Request payload for sending a message.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequestBody {
    /// Receiving user.
    #[schema(format = "uuid")]
    pub receiver_id: String,
    /// Message text.
    pub content: String,
}

/// Response payload describing a message.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageBody {
    /// Message identifier.
    #[schema(format = "uuid")]
    pub id: String,
    /// Sending user.
    #[schema(format = "uuid")]
    pub sender_id: String,
    /// Receiving user.
    #[schema(format = "uuid")]
    pub receiver_id: String,
    /// Message text.
    pub content: String,
    /// Send timestamp.
    #[schema(format = "date-time")]
    pub sent_at: String,
}

impl From<Message> for MessageBody {
    fn from(value: Message) -> Self {
        Self {
            id: value.id().to_string(),
            sender_id: value.sender_id().to_string(),
            receiver_id: value.receiver_id().to_string(),
            content: value.content().to_owned(),
            sent_at: value.sent_at().to_rfc3339(),
        }
    }
}

/// Send a chat message to another user.
#[utoipa::path(
    post,
    path = "/api/v1/messages",
    request_body = SendMessageRequestBody,
    responses(
        (status = 200, description = "Message sent", body = MessageBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Receiver not found", body = ErrorSchema)
    ),
    tags = ["messages"],
    operation_id = "sendMessage",
    security(("SessionCookie" = []))
)]
#[post("/messages")]
pub async fn send_message(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SendMessageRequestBody>,
) -> ApiResult<web::Json<MessageBody>> {
    let principal = session.require_principal()?;
    let SendMessageRequestBody {
        receiver_id,
        content,
    } = payload.into_inner();

    let message = state
        .messaging
        .send_message(SendMessageRequest {
            principal,
            receiver_id: parse_user_id(&receiver_id, FieldName::new("receiverId"))?,
            content,
        })
        .await?;
    Ok(web::Json(message.into()))
}

/// Read the conversation with another user, oldest-first.
#[utoipa::path(
    get,
    path = "/api/v1/messages/{otherUserId}",
    params(("otherUserId" = String, Path, format = "uuid", description = "Conversation partner")),
    responses(
        (status = 200, description = "Conversation messages", body = [MessageBody]),
        (status = 401, description = "Unauthorized", body = ErrorSchema)
    ),
    tags = ["messages"],
    operation_id = "getConversation",
    security(("SessionCookie" = []))
)]
#[get("/messages/{otherUserId}")]
pub async fn get_conversation(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<MessageBody>>> {
    let principal = session.require_principal()?;
    let other = parse_user_id(&path.into_inner(), FieldName::new("otherUserId"))?;
    let listed = state
        .messaging_query
        .get_conversation(principal, other)
        .await?;
    Ok(web::Json(listed.into_iter().map(Into::into).collect()))
}

/// Read the inbox: latest message per conversation partner, newest-first.
#[utoipa::path(
    get,
    path = "/api/v1/inbox",
    responses(
        (status = 200, description = "Inbox entries", body = [MessageBody]),
        (status = 401, description = "Unauthorized", body = ErrorSchema)
    ),
    tags = ["messages"],
    operation_id = "getInbox",
    security(("SessionCookie" = []))
)]
#[get("/inbox")]
pub async fn get_inbox(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<MessageBody>>> {
    let principal = session.require_principal()?;
    let listed = state.messaging_query.get_inbox(principal).await?;
    Ok(web::Json(listed.into_iter().map(Into::into).collect()))
}
