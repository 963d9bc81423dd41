//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::{Clock, DefaultClock};

use backend::Trace;
#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::domain::ports::{
    BookingRepository, FixtureBookingRepository, FixtureListingRepository,
    FixtureMessageRepository, FixtureNotificationRepository, FixtureUserRepository,
    ListingRepository, MessageRepository, NotificationRepository, UserRepository,
};
use backend::domain::{
    BookingService, ListingService, MessagingService, NotificationService, SessionLoginService,
};
use backend::inbound::http::bookings::{
    cancel_booking, create_booking, get_booking, list_owner_bookings, list_renter_bookings,
    update_booking_status,
};
use backend::inbound::http::health::{HealthState, live, ready};
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
use backend::inbound::ws;
use backend::inbound::ws::ConnectionRegistry;
use backend::inbound::ws::state::WsState;
use backend::outbound::persistence::{
    DieselBookingRepository, DieselListingRepository, DieselMessageRepository,
    DieselNotificationRepository, DieselUserRepository,
};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Driven port bundle selected from the configuration.
struct Repositories {
    users: Arc<dyn UserRepository>,
    listings: Arc<dyn ListingRepository>,
    bookings: Arc<dyn BookingRepository>,
    notifications: Arc<dyn NotificationRepository>,
    messages: Arc<dyn MessageRepository>,
}

fn build_repositories(config: &ServerConfig) -> Repositories {
    match &config.db_pool {
        Some(pool) => Repositories {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            listings: Arc::new(DieselListingRepository::new(pool.clone())),
            bookings: Arc::new(DieselBookingRepository::new(pool.clone())),
            notifications: Arc::new(DieselNotificationRepository::new(pool.clone())),
            messages: Arc::new(DieselMessageRepository::new(pool.clone())),
        },
        None => Repositories {
            users: Arc::new(FixtureUserRepository),
            listings: Arc::new(FixtureListingRepository),
            bookings: Arc::new(FixtureBookingRepository),
            notifications: Arc::new(FixtureNotificationRepository),
            messages: Arc::new(FixtureMessageRepository),
        },
    }
}

/// Wire domain services over the selected repositories.
fn build_states(config: &ServerConfig) -> (HttpState, WsState) {
    let repos = build_repositories(config);
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let registry = ConnectionRegistry::new();

    let dispatcher = Arc::new(NotificationService::new(
        repos.notifications,
        clock.clone(),
    ));
    let booking_service = Arc::new(BookingService::new(
        repos.bookings.clone(),
        repos.listings.clone(),
        dispatcher.clone(),
        clock.clone(),
    ));
    let listing_service = Arc::new(ListingService::new(
        repos.listings,
        repos.bookings,
        clock.clone(),
    ));
    let messaging_service = Arc::new(MessagingService::new(
        repos.messages,
        repos.users.clone(),
        dispatcher.clone(),
        Arc::new(registry.clone()),
        clock,
    ));
    let login_service = Arc::new(SessionLoginService::new(repos.users));

    let http_state = HttpState {
        login: login_service,
        listings: listing_service.clone(),
        listings_query: listing_service,
        bookings: booking_service.clone(),
        bookings_query: booking_service,
        notifications: dispatcher.clone(),
        notifications_query: dispatcher,
        messaging: messaging_service.clone(),
        messaging_query: messaging_service,
    };
    let ws_state = WsState::new(registry, http_state.messaging.clone());
    (http_state, ws_state)
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    ws_state: web::Data<WsState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        ws_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    // The WebSocket entry sits outside the API scope but still needs the
    // session cookie, so the middleware wraps the whole app.
    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let api = web::scope("/api/v1")
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
        .service(get_inbox);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(ws_state)
        .wrap(session)
        .wrap(Trace)
        .service(api)
        .service(ws::ws_entry)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let (http_state, ws_state) = build_states(&config);
    let http_state = web::Data::new(http_state);
    let ws_state = web::Data::new(ws_state);
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        db_pool: _,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            ws_state: ws_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
