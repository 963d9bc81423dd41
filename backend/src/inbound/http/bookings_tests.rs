//! Tests for the booking HTTP adapter: session guarding, request parsing,
//! and error status mapping.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, test, web};
use chrono::{TimeZone, Utc};
use uuid::Uuid;

use super::*;
use crate::domain::ports::MockBookingCommand;
use crate::domain::{Principal, Role, UserId};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::test_utils::{mock_state, test_session_middleware};

fn sample_payload(principal: Principal) -> BookingPayload {
    let start_at = Utc
        .with_ymd_and_hms(2024, 6, 10, 12, 0, 0)
        .single()
        .expect("valid timestamp");
    BookingPayload {
        id: Uuid::new_v4(),
        listing_id: Uuid::new_v4(),
        renter_id: principal.id,
        start_at,
        end_at: start_at + chrono::Duration::days(4),
        total_cents: 6_000,
        status: crate::domain::BookingStatus::Pending,
        cancellation_reason: None,
        created_at: start_at,
    }
}

async fn app_with_state(
    state: HttpState,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = actix_web::dev::ServiceResponse,
    Error = actix_web::Error,
> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(test_session_middleware())
            .route(
                "/test/login",
                web::post().to(|session: SessionContext| async move {
                    let principal = Principal {
                        id: UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6")
                            .expect("fixture id"),
                        role: Role::Renter,
                    };
                    session.persist_principal(principal)?;
                    Ok::<_, Error>(HttpResponse::Ok())
                }),
            )
            .service(create_booking)
            .service(list_renter_bookings)
            .service(list_owner_bookings)
            .service(get_booking)
            .service(update_booking_status)
            .service(cancel_booking),
    )
    .await
}

async fn login_cookie<S>(app: &S) -> actix_web::cookie::Cookie<'static>
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let res = test::call_service(
        app,
        test::TestRequest::post().uri("/test/login").to_request(),
    )
    .await;
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

fn create_body() -> serde_json::Value {
    serde_json::json!({
        "listingId": Uuid::new_v4().to_string(),
        "startAt": "2024-06-10T12:00:00Z",
        "endAt": "2024-06-14T12:00:00Z",
        "totalCents": 6000,
    })
}

#[actix_web::test]
async fn create_booking_requires_a_session() {
    let app = app_with_state(mock_state()).await;
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/bookings")
            .set_json(create_body())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn create_booking_returns_the_engine_payload() {
    let principal = Principal {
        id: UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("fixture id"),
        role: Role::Renter,
    };
    let payload = sample_payload(principal);
    let expected_id = payload.id;

    let mut bookings = MockBookingCommand::new();
    bookings
        .expect_create_booking()
        .times(1)
        .withf(|request| request.total_cents == 6_000)
        .returning(move |_| Ok(payload.clone()));

    let mut state = mock_state();
    state.bookings = Arc::new(bookings);
    let app = app_with_state(state).await;
    let cookie = login_cookie(&app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/bookings")
            .cookie(cookie)
            .set_json(create_body())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: BookingBody = test::read_body_json(res).await;
    assert_eq!(body.id, expected_id.to_string());
    assert_eq!(body.status, "pending");
}

#[actix_web::test]
async fn create_booking_rejects_malformed_listing_ids() {
    let app = app_with_state(mock_state()).await;
    let cookie = login_cookie(&app).await;

    let mut body = create_body();
    body["listingId"] = serde_json::json!("not-a-uuid");
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/bookings")
            .cookie(cookie)
            .set_json(body)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let error: Error = test::read_body_json(res).await;
    let details = error.details().expect("details attached");
    assert_eq!(details["field"], "listingId");
}

#[actix_web::test]
async fn overlap_conflicts_surface_as_409() {
    let mut bookings = MockBookingCommand::new();
    bookings
        .expect_create_booking()
        .returning(|_| Err(Error::conflict("this listing is already booked")));

    let mut state = mock_state();
    state.bookings = Arc::new(bookings);
    let app = app_with_state(state).await;
    let cookie = login_cookie(&app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/bookings")
            .cookie(cookie)
            .set_json(create_body())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn update_status_rejects_unknown_status_strings() {
    let app = app_with_state(mock_state()).await;
    let cookie = login_cookie(&app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/bookings/{}/status", Uuid::new_v4()))
            .cookie(cookie)
            .set_json(serde_json::json!({ "status": "approved" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn cancellation_passes_the_reason_through() {
    let principal = Principal {
        id: UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("fixture id"),
        role: Role::Renter,
    };
    let cancelled = BookingPayload {
        status: crate::domain::BookingStatus::Cancelled,
        cancellation_reason: Some("route changed".to_owned()),
        ..sample_payload(principal)
    };

    let mut bookings = MockBookingCommand::new();
    bookings
        .expect_cancel_booking()
        .times(1)
        .withf(|request| request.reason == "route changed")
        .returning(move |_| Ok(cancelled.clone()));

    let mut state = mock_state();
    state.bookings = Arc::new(bookings);
    let app = app_with_state(state).await;
    let cookie = login_cookie(&app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/bookings/{}/cancellation", Uuid::new_v4()))
            .cookie(cookie)
            .set_json(serde_json::json!({ "reason": "route changed" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: BookingBody = test::read_body_json(res).await;
    assert_eq!(body.status, "cancelled");
    assert_eq!(body.cancellation_reason.as_deref(), Some("route changed"));
}
