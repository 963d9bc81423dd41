//! In-memory implementations of the driven ports for integration tests.
//!
//! One store backs every repository port so scenario tests can wire the real
//! domain services against consistent shared state without PostgreSQL. The
//! booking write path serialises its overlap check behind the store mutex,
//! matching the atomicity contract of the Diesel adapter.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::ports::{
    BookingDetails, BookingRepository, BookingRepositoryError, ListingFilter, ListingRepository,
    ListingRepositoryError, ListingSummary, MessageRepository, MessageRepositoryError,
    NotificationRepository, NotificationRepositoryError, UserRepository, UserRepositoryError,
    UserSummary,
};
use crate::domain::{
    Booking, BookingStatus, Listing, Message, Notification, Role, User, UserId,
};

/// Shared in-memory backing store implementing every repository port.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    users: Arc<Mutex<Vec<User>>>,
    listings: Arc<Mutex<Vec<Listing>>>,
    bookings: Arc<Mutex<Vec<Booking>>>,
    notifications: Arc<Mutex<Vec<Notification>>>,
    messages: Arc<Mutex<Vec<Message>>>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user directly, bypassing the login flow.
    pub async fn seed_user(&self, user: User) {
        self.users.lock().await.push(user);
    }

    /// Insert a listing directly, bypassing the listing service.
    pub async fn seed_listing(&self, listing: Listing) {
        self.listings.lock().await.push(listing);
    }

    /// Snapshot of all notifications for `user`, newest-first.
    pub async fn notifications_for(&self, user: UserId) -> Vec<Notification> {
        let mut listed: Vec<Notification> = self
            .notifications
            .lock()
            .await
            .iter()
            .filter(|n| n.user_id() == user)
            .cloned()
            .collect();
        listed.sort_by_key(|n| std::cmp::Reverse(n.created_at()));
        listed
    }

    async fn details_for(&self, booking: Booking) -> Result<BookingDetails, BookingRepositoryError> {
        let listing = self
            .listings
            .lock()
            .await
            .iter()
            .find(|l| l.id() == booking.listing_id())
            .cloned()
            .ok_or_else(|| BookingRepositoryError::query("booking references missing listing"))?;
        let renter = self
            .users
            .lock()
            .await
            .iter()
            .find(|u| u.id() == booking.renter())
            .cloned()
            .ok_or_else(|| BookingRepositoryError::query("booking references missing renter"))?;
        Ok(BookingDetails {
            listing: ListingSummary {
                id: listing.id(),
                title: listing.title().to_owned(),
                price_cents: listing.price_cents(),
                owner_id: listing.owner(),
            },
            renter: UserSummary {
                id: renter.id(),
                display_name: renter.display_name().to_owned(),
            },
            booking,
        })
    }

    async fn collect_details(
        &self,
        mut bookings: Vec<Booking>,
    ) -> Result<Vec<BookingDetails>, BookingRepositoryError> {
        bookings.sort_by_key(|b| std::cmp::Reverse(b.created_at()));
        let mut detailed = Vec::with_capacity(bookings.len());
        for booking in bookings {
            detailed.push(self.details_for(booking).await?);
        }
        Ok(detailed)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, user_id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self
            .users
            .lock()
            .await
            .iter()
            .find(|u| u.id() == *user_id)
            .cloned())
    }

    async fn find_or_create(
        &self,
        display_name: &str,
        role: Role,
    ) -> Result<User, UserRepositoryError> {
        let mut users = self.users.lock().await;
        if let Some(existing) = users.iter().find(|u| u.display_name() == display_name) {
            return Ok(existing.clone());
        }
        let user = User::new(UserId::random(), display_name, role)
            .map_err(|err| UserRepositoryError::query(err.to_string()))?;
        users.push(user.clone());
        Ok(user)
    }
}

fn matches_filter(listing: &Listing, filter: &ListingFilter) -> bool {
    if let Some(category) = filter.category {
        if listing.category() != category {
            return false;
        }
    }
    if let Some(location) = &filter.location {
        if !listing
            .location()
            .to_lowercase()
            .contains(&location.to_lowercase())
        {
            return false;
        }
    }
    if let Some(min_price) = filter.min_price_cents {
        if listing.price_cents() < min_price {
            return false;
        }
    }
    if let Some(max_price) = filter.max_price_cents {
        if listing.price_cents() > max_price {
            return false;
        }
    }
    if let Some(from) = filter.available_from {
        if listing.availability().start_at() > from {
            return false;
        }
    }
    if let Some(until) = filter.available_until {
        if listing.availability().end_at() < until {
            return false;
        }
    }
    true
}

#[async_trait]
impl ListingRepository for InMemoryStore {
    async fn insert(&self, listing: &Listing) -> Result<(), ListingRepositoryError> {
        self.listings.lock().await.push(listing.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        listing_id: &Uuid,
    ) -> Result<Option<Listing>, ListingRepositoryError> {
        Ok(self
            .listings
            .lock()
            .await
            .iter()
            .find(|l| l.id() == *listing_id)
            .cloned())
    }

    async fn search(&self, filter: &ListingFilter) -> Result<Vec<Listing>, ListingRepositoryError> {
        Ok(self
            .listings
            .lock()
            .await
            .iter()
            .rev()
            .filter(|l| matches_filter(l, filter))
            .cloned()
            .collect())
    }

    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Listing>, ListingRepositoryError> {
        Ok(self
            .listings
            .lock()
            .await
            .iter()
            .rev()
            .filter(|l| l.owner() == *owner)
            .cloned()
            .collect())
    }

    async fn update(&self, listing: &Listing) -> Result<(), ListingRepositoryError> {
        let mut listings = self.listings.lock().await;
        if let Some(slot) = listings.iter_mut().find(|l| l.id() == listing.id()) {
            *slot = listing.clone();
        }
        Ok(())
    }

    async fn delete(&self, listing_id: &Uuid) -> Result<(), ListingRepositoryError> {
        self.listings.lock().await.retain(|l| l.id() != *listing_id);
        Ok(())
    }
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn insert_if_vacant(&self, booking: &Booking) -> Result<(), BookingRepositoryError> {
        // The mutex serialises check and insert, closing the
        // check-then-act race the same way the advisory lock does.
        let mut bookings = self.bookings.lock().await;
        let overlapping = bookings.iter().any(|existing| {
            existing.listing_id() == booking.listing_id()
                && existing.stored_status() != BookingStatus::Cancelled
                && existing.period().overlaps(&booking.period())
        });
        if overlapping {
            return Err(BookingRepositoryError::Overlap);
        }
        bookings.push(booking.clone());
        Ok(())
    }

    async fn find_detailed(
        &self,
        booking_id: &Uuid,
    ) -> Result<Option<BookingDetails>, BookingRepositoryError> {
        let found = self
            .bookings
            .lock()
            .await
            .iter()
            .find(|b| b.id() == *booking_id)
            .cloned();
        match found {
            Some(booking) => self.details_for(booking).await.map(Some),
            None => Ok(None),
        }
    }

    async fn list_for_renter(
        &self,
        renter: &UserId,
    ) -> Result<Vec<BookingDetails>, BookingRepositoryError> {
        let bookings: Vec<Booking> = self
            .bookings
            .lock()
            .await
            .iter()
            .filter(|b| b.renter() == *renter)
            .cloned()
            .collect();
        self.collect_details(bookings).await
    }

    async fn list_for_owner(
        &self,
        owner: &UserId,
    ) -> Result<Vec<BookingDetails>, BookingRepositoryError> {
        let owned: Vec<Uuid> = self
            .listings
            .lock()
            .await
            .iter()
            .filter(|l| l.owner() == *owner)
            .map(Listing::id)
            .collect();
        let bookings: Vec<Booking> = self
            .bookings
            .lock()
            .await
            .iter()
            .filter(|b| owned.contains(&b.listing_id()))
            .cloned()
            .collect();
        self.collect_details(bookings).await
    }

    async fn update(&self, booking: &Booking) -> Result<(), BookingRepositoryError> {
        let mut bookings = self.bookings.lock().await;
        if let Some(slot) = bookings.iter_mut().find(|b| b.id() == booking.id()) {
            *slot = booking.clone();
        }
        Ok(())
    }

    async fn has_blocking_bookings(
        &self,
        listing_id: &Uuid,
        reference: DateTime<Utc>,
    ) -> Result<bool, BookingRepositoryError> {
        Ok(self.bookings.lock().await.iter().any(|b| {
            b.listing_id() == *listing_id
                && b.stored_status() != BookingStatus::Cancelled
                && b.period().end_at() >= reference
        }))
    }
}

#[async_trait]
impl NotificationRepository for InMemoryStore {
    async fn insert(&self, notification: &Notification) -> Result<(), NotificationRepositoryError> {
        self.notifications.lock().await.push(notification.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        notification_id: &Uuid,
    ) -> Result<Option<Notification>, NotificationRepositoryError> {
        Ok(self
            .notifications
            .lock()
            .await
            .iter()
            .find(|n| n.id() == *notification_id)
            .cloned())
    }

    async fn list_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        Ok(self.notifications_for(*user).await)
    }

    async fn update(&self, notification: &Notification) -> Result<(), NotificationRepositoryError> {
        let mut notifications = self.notifications.lock().await;
        if let Some(slot) = notifications.iter_mut().find(|n| n.id() == notification.id()) {
            *slot = notification.clone();
        }
        Ok(())
    }

    async fn delete(&self, notification_id: &Uuid) -> Result<(), NotificationRepositoryError> {
        self.notifications
            .lock()
            .await
            .retain(|n| n.id() != *notification_id);
        Ok(())
    }
}

#[async_trait]
impl MessageRepository for InMemoryStore {
    async fn insert(&self, message: &Message) -> Result<(), MessageRepositoryError> {
        self.messages.lock().await.push(message.clone());
        Ok(())
    }

    async fn conversation(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<Vec<Message>, MessageRepositoryError> {
        let mut listed: Vec<Message> = self
            .messages
            .lock()
            .await
            .iter()
            .filter(|m| {
                (m.sender_id() == *a && m.receiver_id() == *b)
                    || (m.sender_id() == *b && m.receiver_id() == *a)
            })
            .cloned()
            .collect();
        listed.sort_by_key(Message::sent_at);
        Ok(listed)
    }

    async fn list_touching_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<Message>, MessageRepositoryError> {
        let mut listed: Vec<Message> = self
            .messages
            .lock()
            .await
            .iter()
            .filter(|m| m.sender_id() == *user || m.receiver_id() == *user)
            .cloned()
            .collect();
        // Reverse insertion order first so equal timestamps break towards
        // the most recently stored message, as a database sequence would.
        listed.reverse();
        listed.sort_by_key(|m| std::cmp::Reverse(m.sent_at()));
        Ok(listed)
    }
}
