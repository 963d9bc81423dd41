//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, live delivery) are implemented by outbound
//! adapters; driving ports (commands and queries) are implemented by the
//! domain services and consumed by inbound adapters.

mod booking_command;
mod booking_query;
mod booking_repository;
mod listing_command;
mod listing_query;
mod listing_repository;
mod live_delivery;
mod login;
mod message_repository;
mod messaging;
mod notification_repository;
mod notifications;
mod user_repository;

#[cfg(test)]
pub use booking_command::MockBookingCommand;
pub use booking_command::{
    BookingCommand, CancelBookingRequest, CreateBookingRequest, UpdateBookingStatusRequest,
};
#[cfg(test)]
pub use booking_query::MockBookingQuery;
pub use booking_query::{
    BookingDetailsPayload, BookingPayload, BookingQuery, GetBookingRequest, ListingSummaryPayload,
    UserSummaryPayload,
};
#[cfg(test)]
pub use booking_repository::MockBookingRepository;
pub use booking_repository::{
    BookingDetails, BookingRepository, BookingRepositoryError, FixtureBookingRepository,
    ListingSummary, UserSummary,
};
#[cfg(test)]
pub use listing_command::MockListingCommand;
pub use listing_command::{
    CreateListingRequest, DeleteListingRequest, ListingCommand, ListingDraftPayload,
    UpdateListingRequest,
};
#[cfg(test)]
pub use listing_query::MockListingQuery;
pub use listing_query::{ListingPayload, ListingQuery, SearchListingsRequest};
#[cfg(test)]
pub use listing_repository::MockListingRepository;
pub use listing_repository::{
    FixtureListingRepository, ListingFilter, ListingRepository, ListingRepositoryError,
};
#[cfg(test)]
pub use live_delivery::MockLiveDelivery;
pub use live_delivery::{LiveDelivery, LiveEvent, OfflineLiveDelivery};
#[cfg(test)]
pub use login::MockLoginService;
pub use login::{LoginRequest, LoginService, UserPayload};
#[cfg(test)]
pub use message_repository::MockMessageRepository;
pub use message_repository::{
    FixtureMessageRepository, MessageRepository, MessageRepositoryError,
};
#[cfg(test)]
pub use messaging::{MockMessagingCommand, MockMessagingQuery};
pub use messaging::{MessagingCommand, MessagingQuery, SendMessageRequest};
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
pub use notification_repository::{
    FixtureNotificationRepository, NotificationRepository, NotificationRepositoryError,
};
#[cfg(test)]
pub use notifications::{
    MockNotificationDispatch, MockNotificationsCommand, MockNotificationsQuery,
};
pub use notifications::{
    DeleteNotificationRequest, MarkNotificationReadRequest, NotificationDispatch,
    NotificationPayload, NotificationsCommand, NotificationsQuery,
};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{FixtureUserRepository, UserRepository, UserRepositoryError};
