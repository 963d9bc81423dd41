//! Domain entities, services, and ports for the rental marketplace core.
//!
//! Entities are immutable with validated constructors; services implement the
//! driving ports in `ports` and depend only on driven ports, so every adapter
//! (HTTP, WebSocket, Diesel) stays at the edge of the system.

pub mod booking;
mod booking_service;
pub mod error;
pub mod listing;
mod listing_service;
mod login_service;
pub mod message;
mod messaging_service;
pub mod notification;
mod notification_service;
pub mod period;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::booking::{
    Booking, BookingDraft, BookingStatus, BookingValidationError, CANCELLATION_CUTOFF,
    CancellationBlocker,
};
pub use self::booking_service::BookingService;
pub use self::error::{Error, ErrorCode};
pub use self::listing::{Category, Listing, ListingDraft, ListingValidationError, TITLE_MAX};
pub use self::listing_service::ListingService;
pub use self::login_service::SessionLoginService;
pub use self::message::{CONTENT_MAX, Message, MessageValidationError};
pub use self::messaging_service::MessagingService;
pub use self::notification::{Notification, NotificationKind, NotificationValidationError};
pub use self::notification_service::NotificationService;
pub use self::period::{EmptyPeriodError, RentalPeriod};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{DISPLAY_NAME_MAX, Principal, Role, User, UserId, UserValidationError};

/// Convenient result alias for domain operations.
///
/// # Examples
/// ```
/// use backend::domain::{ApiResult, Error};
///
/// fn guard(authorised: bool) -> ApiResult<()> {
///     if authorised {
///         Ok(())
///     } else {
///         Err(Error::forbidden("nope"))
///     }
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
