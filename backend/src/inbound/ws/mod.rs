//! WebSocket inbound adapter for live chat delivery.
//!
//! Responsibilities:
//! - validate upgrade requests (origin allow-list, authenticated session)
//! - register the connection so the messaging core can push to it
//! - keep WebSocket-specific concerns at the edge of the system

use actix_web::http::header::{HeaderValue, ORIGIN};
use actix_web::web::{self, Payload};
use actix_web::{HttpRequest, HttpResponse, get};
use tracing::{error, warn};
use url::Url;

use crate::inbound::http::session::SessionContext;

pub mod messages;
pub mod registry;
mod session;
pub mod state;

pub use registry::ConnectionRegistry;

/// Handle WebSocket upgrade for the `/ws` endpoint.
#[get("/ws")]
pub async fn ws_entry(
    state: web::Data<state::WsState>,
    session_ctx: SessionContext,
    req: HttpRequest,
    stream: Payload,
) -> actix_web::Result<HttpResponse> {
    if let Some(origin_header) = req.headers().get(ORIGIN) {
        validate_origin(origin_header)?;
    }

    let principal = session_ctx.require_principal()?;

    let (response, ws_session, msg_stream) = actix_ws::handle(&req, stream)?;
    state.registry.register(principal.id, ws_session.clone()).await;
    actix_web::rt::spawn(session::run_session(
        state.get_ref().clone(),
        principal,
        ws_session,
        msg_stream,
    ));

    Ok(response)
}

fn validate_origin(origin_header: &HeaderValue) -> actix_web::Result<()> {
    let origin_value = match origin_header.to_str() {
        Ok(value) => value,
        Err(err) => {
            error!(error = %err, "failed to parse Origin header as string");
            return Err(actix_web::error::ErrorBadRequest("Invalid Origin header"));
        }
    };

    let origin = Url::parse(origin_value).map_err(|err| {
        error!(error = %err, "failed to parse Origin header as URL");
        actix_web::error::ErrorBadRequest("Invalid Origin header")
    })?;

    if is_allowed_origin(&origin) {
        Ok(())
    } else {
        warn!(
            origin = origin_value,
            "rejected WS upgrade due to disallowed Origin"
        );
        Err(actix_web::error::ErrorForbidden("Origin not allowed"))
    }
}

const PRIMARY_HOST: &str = "epicjourneyrentals.example";
const ALLOWED_SUBDOMAIN_SUFFIX: &str = ".epicjourneyrentals.example";
const LOCALHOST: &str = "localhost";

/// Returns true when a parsed Origin belongs to the static allow-list.
///
/// Accepts HTTPS from the production root domain and its subdomains, plus
/// HTTP from localhost with an explicit non-zero port for the Vite dev
/// server.
fn is_allowed_origin(origin: &Url) -> bool {
    let Some(host) = origin.host_str() else {
        return false;
    };

    match origin.scheme() {
        "http" if host == LOCALHOST => matches!(origin.port(), Some(port) if port != 0),
        "https" if host == PRIMARY_HOST => true,
        "https" if host.strip_suffix(ALLOWED_SUBDOMAIN_SUFFIX).is_some() => true,
        _ => false,
    }
}
