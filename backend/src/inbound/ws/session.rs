//! Per-connection WebSocket task.

use actix_ws::AggregatedMessage;
use futures_util::StreamExt as _;
use tracing::{debug, warn};

use crate::domain::ports::SendMessageRequest;
use crate::domain::{Principal, UserId};
use crate::inbound::ws::messages::{ClientFrame, MessageFrame, ServerFrame};
use crate::inbound::ws::state::WsState;

/// Upper bound for aggregated continuation frames.
const MAX_FRAME_BYTES: usize = 64 * 1024;

async fn send_frame(session: &mut actix_ws::Session, frame: &ServerFrame) -> bool {
    match serde_json::to_string(frame) {
        Ok(text) => session.text(text).await.is_ok(),
        Err(error) => {
            warn!(%error, "failed to serialise websocket frame");
            false
        }
    }
}

async fn handle_frame(
    state: &WsState,
    principal: Principal,
    session: &mut actix_ws::Session,
    raw: &str,
) -> bool {
    let frame: ClientFrame = match serde_json::from_str(raw) {
        Ok(frame) => frame,
        Err(error) => {
            debug!(%error, "rejecting malformed websocket frame");
            return send_frame(
                session,
                &ServerFrame::Error {
                    message: "malformed frame".to_owned(),
                },
            )
            .await;
        }
    };

    let ClientFrame::SendMessage {
        receiver_id,
        content,
    } = frame;
    let receiver = match UserId::new(&receiver_id) {
        Ok(receiver) => receiver,
        Err(_) => {
            return send_frame(
                session,
                &ServerFrame::Error {
                    message: "receiverId must be a valid UUID".to_owned(),
                },
            )
            .await;
        }
    };

    match state
        .messaging
        .send_message(SendMessageRequest {
            principal,
            receiver_id: receiver,
            content,
        })
        .await
    {
        Ok(message) => {
            send_frame(
                session,
                &ServerFrame::MessageSent {
                    message: MessageFrame::from(&message),
                },
            )
            .await
        }
        Err(error) => {
            send_frame(
                session,
                &ServerFrame::Error {
                    message: error.message().to_owned(),
                },
            )
            .await
        }
    }
}

/// Drive a connection until the client goes away, then clean up the registry.
pub async fn run_session(
    state: WsState,
    principal: Principal,
    mut session: actix_ws::Session,
    stream: actix_ws::MessageStream,
) {
    let mut stream = stream
        .aggregate_continuations()
        .max_continuation_size(MAX_FRAME_BYTES);

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(AggregatedMessage::Text(text)) => {
                if !handle_frame(&state, principal, &mut session, text.as_ref()).await {
                    break;
                }
            }
            Ok(AggregatedMessage::Ping(bytes)) => {
                if session.pong(&bytes).await.is_err() {
                    break;
                }
            }
            Ok(AggregatedMessage::Close(reason)) => {
                debug!(user = %principal.id, ?reason, "websocket closed by peer");
                break;
            }
            Ok(_) => {}
            Err(error) => {
                warn!(user = %principal.id, %error, "websocket protocol error");
                break;
            }
        }
    }

    state.registry.unregister(&principal.id).await;
    session.close(None).await.ok();
}
