//! Diesel persistence adapters implementing the driven repository ports.

mod diesel_booking_repository;
mod diesel_listing_repository;
mod diesel_message_repository;
mod diesel_notification_repository;
mod diesel_user_repository;
mod error_mapping;
mod models;
mod pool;
pub mod schema;

pub use diesel_booking_repository::DieselBookingRepository;
pub use diesel_listing_repository::DieselListingRepository;
pub use diesel_message_repository::DieselMessageRepository;
pub use diesel_notification_repository::DieselNotificationRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
