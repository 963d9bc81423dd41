//! HTTP surface walkthrough: real services over the in-memory store, driven
//! through the REST adapter with cookie sessions.

use std::sync::Arc;

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Cookie, Key};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use chrono::{DateTime, TimeZone, Utc};
use mockable::MockClock;

use backend::domain::ports::OfflineLiveDelivery;
use backend::domain::{
    BookingService, ListingService, MessagingService, NotificationService, SessionLoginService,
};
use backend::inbound::http::bookings::{
    cancel_booking, create_booking, get_booking, list_owner_bookings, list_renter_bookings,
    update_booking_status,
};
use backend::inbound::http::listings::{
    create_listing, delete_listing, get_listing, list_own_listings, search_listings,
    update_listing,
};
use backend::inbound::http::messages::{get_conversation, get_inbox, send_message};
use backend::inbound::http::notifications::{
    delete_notification, list_notifications, mark_notification_read,
};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::users::{current_user, login};
use backend::middleware::Trace;
use backend::test_support::InMemoryStore;

fn at(month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, month, day, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn http_state(store: &InMemoryStore, now: DateTime<Utc>) -> HttpState {
    let mut clock = MockClock::new();
    clock.expect_utc().return_const(now);
    let clock = Arc::new(clock);

    let dispatcher = Arc::new(NotificationService::new(
        Arc::new(store.clone()),
        clock.clone(),
    ));
    let booking_service = Arc::new(BookingService::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        dispatcher.clone(),
        clock.clone(),
    ));
    let listing_service = Arc::new(ListingService::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        clock.clone(),
    ));
    let messaging_service = Arc::new(MessagingService::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        dispatcher.clone(),
        Arc::new(OfflineLiveDelivery),
        clock,
    ));

    HttpState {
        login: Arc::new(SessionLoginService::new(Arc::new(store.clone()))),
        listings: listing_service.clone(),
        listings_query: listing_service,
        bookings: booking_service.clone(),
        bookings_query: booking_service,
        notifications: dispatcher.clone(),
        notifications_query: dispatcher,
        messaging: messaging_service.clone(),
        messaging_query: messaging_service,
    }
}

macro_rules! marketplace_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .wrap(Trace)
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), Key::from(&[7; 64]))
                        .cookie_name("session".into())
                        .cookie_secure(false)
                        .build(),
                )
                .service(login)
                .service(current_user)
                .service(create_listing)
                .service(search_listings)
                .service(list_own_listings)
                .service(get_listing)
                .service(update_listing)
                .service(delete_listing)
                .service(create_booking)
                .service(list_renter_bookings)
                .service(list_owner_bookings)
                .service(get_booking)
                .service(update_booking_status)
                .service(cancel_booking)
                .service(list_notifications)
                .service(mark_notification_read)
                .service(delete_notification)
                .service(send_message)
                .service(get_conversation)
                .service(get_inbox),
        )
        .await
    };
}

async fn login_as<S>(app: &S, display_name: &str, role: &str) -> (String, Cookie<'static>)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/login")
            .set_json(serde_json::json!({ "displayName": display_name, "role": role }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK, "login should succeed");
    let cookie = res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned();
    let body: serde_json::Value = test::read_body_json(res).await;
    (
        body["id"].as_str().expect("user id present").to_owned(),
        cookie,
    )
}

fn listing_body() -> serde_json::Value {
    serde_json::json!({
        "title": "Touring camper",
        "description": "Sleeps two",
        "category": "vehicle",
        "priceCents": 1000,
        "images": [],
        "location": "Ljubljana",
        "availableFrom": "2024-06-01T00:00:00Z",
        "availableUntil": "2024-09-01T00:00:00Z",
    })
}

#[actix_web::test]
async fn full_booking_flow_over_http() {
    let store = InMemoryStore::new();
    let app = marketplace_app!(http_state(&store, at(5, 1, 12)));

    let (_owner_id, owner_cookie) = login_as(&app, "Quinn", "owner").await;
    let (renter_id, renter_cookie) = login_as(&app, "Iris", "renter").await;

    // The owner publishes a listing.
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/listings")
            .cookie(owner_cookie.clone())
            .set_json(listing_body())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let listing: serde_json::Value = test::read_body_json(res).await;
    let listing_id = listing["id"].as_str().expect("listing id").to_owned();

    // The renter books four days.
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/bookings")
            .cookie(renter_cookie.clone())
            .set_json(serde_json::json!({
                "listingId": listing_id,
                "startAt": "2024-06-01T12:00:00Z",
                "endAt": "2024-06-05T12:00:00Z",
                "totalCents": 4000,
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let booking: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(booking["status"], "pending");
    assert_eq!(booking["renterId"], renter_id);
    let booking_id = booking["id"].as_str().expect("booking id").to_owned();

    // The owner sees exactly one notification and one inbound booking.
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/notifications")
            .cookie(owner_cookie.clone())
            .to_request(),
    )
    .await;
    let notifications: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(notifications.as_array().expect("array").len(), 1);
    assert_eq!(notifications[0]["kind"], "booking");

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/bookings/owner")
            .cookie(owner_cookie.clone())
            .to_request(),
    )
    .await;
    let owned: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(owned.as_array().expect("array").len(), 1);
    assert_eq!(owned[0]["booking"]["id"], booking_id.as_str());

    // A second renter overlapping the range gets a 409.
    let (_, other_cookie) = login_as(&app, "Noor", "renter").await;
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/bookings")
            .cookie(other_cookie.clone())
            .set_json(serde_json::json!({
                "listingId": listing_id,
                "startAt": "2024-06-03T12:00:00Z",
                "endAt": "2024-06-07T12:00:00Z",
                "totalCents": 4000,
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // The owner confirms; the renter is notified.
    let res = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/bookings/{booking_id}/status"))
            .cookie(owner_cookie.clone())
            .set_json(serde_json::json!({ "status": "confirmed" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let confirmed: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(confirmed["status"], "confirmed");

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/notifications")
            .cookie(renter_cookie.clone())
            .to_request(),
    )
    .await;
    let renter_notifications: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(renter_notifications.as_array().expect("array").len(), 1);

    // A stranger cannot read the booking.
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/bookings/{booking_id}"))
            .cookie(other_cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Deleting the listing is blocked while the confirmed stay is live.
    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/listings/{listing_id}"))
            .cookie(owner_cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn messaging_flow_over_http() {
    let store = InMemoryStore::new();
    let app = marketplace_app!(http_state(&store, at(6, 1, 9)));

    let (priya_id, priya_cookie) = login_as(&app, "Priya", "renter").await;
    let (quinn_id, quinn_cookie) = login_as(&app, "Quinn", "owner").await;

    // Priya messages Quinn; Quinn replies.
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/messages")
            .cookie(priya_cookie.clone())
            .set_json(serde_json::json!({ "receiverId": quinn_id, "content": "Hi" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/messages")
            .cookie(quinn_cookie.clone())
            .set_json(serde_json::json!({ "receiverId": priya_id, "content": "Hello" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    // The conversation merges both directions oldest-first.
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/messages/{quinn_id}"))
            .cookie(priya_cookie.clone())
            .to_request(),
    )
    .await;
    let conversation: serde_json::Value = test::read_body_json(res).await;
    let contents: Vec<&str> = conversation
        .as_array()
        .expect("array")
        .iter()
        .map(|m| m["content"].as_str().expect("content"))
        .collect();
    assert_eq!(contents, vec!["Hi", "Hello"]);

    // Each inbox shows one entry holding the latest message.
    for cookie in [priya_cookie, quinn_cookie.clone()] {
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/inbox").cookie(cookie).to_request(),
        )
        .await;
        let inbox: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(inbox.as_array().expect("array").len(), 1);
        assert_eq!(inbox[0]["content"], "Hello");
    }

    // Quinn's message notification can be acknowledged and removed.
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/notifications")
            .cookie(quinn_cookie.clone())
            .to_request(),
    )
    .await;
    let notifications: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(notifications[0]["kind"], "message");
    assert_eq!(notifications[0]["message"], "New message from Priya");
    let notification_id = notifications[0]["id"].as_str().expect("id").to_owned();

    let res = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/notifications/{notification_id}/read"))
            .cookie(quinn_cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let marked: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(marked["isRead"], true);

    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/notifications/{notification_id}"))
            .cookie(quinn_cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn search_filters_listings() {
    let store = InMemoryStore::new();
    let app = marketplace_app!(http_state(&store, at(5, 1, 12)));

    let (_, owner_cookie) = login_as(&app, "Quinn", "owner").await;
    for (title, category, price) in [
        ("Touring camper", "vehicle", 9_000),
        ("Pannier set", "gear", 900),
    ] {
        let mut body = listing_body();
        body["title"] = serde_json::json!(title);
        body["category"] = serde_json::json!(category);
        body["priceCents"] = serde_json::json!(price);
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/listings")
                .cookie(owner_cookie.clone())
                .set_json(body)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/listings?category=gear&maxPriceCents=1000")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let found: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(found.as_array().expect("array").len(), 1);
    assert_eq!(found[0]["title"], "Pannier set");
}
