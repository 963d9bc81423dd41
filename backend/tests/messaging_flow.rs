//! End-to-end messaging scenarios over the real relay and the in-memory
//! store: conversation ordering, inbox grouping, and the dual-write send.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use mockable::MockClock;

use backend::domain::ports::{
    LiveDelivery, LiveEvent, MessagingCommand, MessagingQuery, SendMessageRequest,
};
use backend::domain::{
    MessagingService, NotificationKind, NotificationService, Principal, Role, User, UserId,
};
use backend::test_support::InMemoryStore;

fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 9, minute, 0)
        .single()
        .expect("valid timestamp")
}

/// Delivery double counting pushes and reporting a fixed outcome.
struct CountingDelivery {
    delivered: bool,
    pushes: AtomicUsize,
}

impl CountingDelivery {
    fn new(delivered: bool) -> Self {
        Self {
            delivered,
            pushes: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl LiveDelivery for CountingDelivery {
    async fn deliver_to(&self, _user: &UserId, _event: &LiveEvent) -> bool {
        self.pushes.fetch_add(1, Ordering::SeqCst);
        self.delivered
    }
}

struct Chat {
    store: InMemoryStore,
    delivery: Arc<CountingDelivery>,
    p: Principal,
    q: Principal,
}

async fn chat_between(delivered: bool, now: DateTime<Utc>) -> (Chat, MessagingService) {
    let store = InMemoryStore::new();
    let p = User::new(UserId::random(), "Priya", Role::Renter).expect("valid user");
    let q = User::new(UserId::random(), "Quinn", Role::Owner).expect("valid user");
    store.seed_user(p.clone()).await;
    store.seed_user(q.clone()).await;

    let mut clock = MockClock::new();
    clock.expect_utc().return_const(now);
    let clock = Arc::new(clock);
    let delivery = Arc::new(CountingDelivery::new(delivered));
    let dispatcher = Arc::new(NotificationService::new(
        Arc::new(store.clone()),
        clock.clone(),
    ));
    let service = MessagingService::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        dispatcher,
        delivery.clone(),
        clock,
    );

    (
        Chat {
            store,
            delivery,
            p: p.principal(),
            q: q.principal(),
        },
        service,
    )
}

async fn send(
    service: &MessagingService,
    from: Principal,
    to: Principal,
    content: &str,
) -> backend::domain::Message {
    service
        .send_message(SendMessageRequest {
            principal: from,
            receiver_id: to.id,
            content: content.to_owned(),
        })
        .await
        .expect("send succeeds")
}

fn relay_at(chat: &Chat, now: DateTime<Utc>) -> MessagingService {
    let mut clock = MockClock::new();
    clock.expect_utc().return_const(now);
    let clock = Arc::new(clock);
    let dispatcher = Arc::new(NotificationService::new(
        Arc::new(chat.store.clone()),
        clock.clone(),
    ));
    MessagingService::new(
        Arc::new(chat.store.clone()),
        Arc::new(chat.store.clone()),
        dispatcher,
        chat.delivery.clone(),
        clock,
    )
}

#[tokio::test]
async fn conversation_merges_both_directions_in_send_order() {
    let (chat, service) = chat_between(true, at(0)).await;

    send(&service, chat.p, chat.q, "Hi").await;
    // the reply lands five minutes later
    let later = relay_at(&chat, at(5));
    send(&later, chat.q, chat.p, "Hello").await;

    let conversation = service
        .get_conversation(chat.p, chat.q.id)
        .await
        .expect("conversation succeeds");
    assert_eq!(conversation.len(), 2);
    assert_eq!(conversation[0].content(), "Hi");
    assert_eq!(conversation[1].content(), "Hello");

    // Both inboxes collapse to the single latest message.
    for principal in [chat.p, chat.q] {
        let inbox = service.get_inbox(principal).await.expect("inbox succeeds");
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].content(), "Hello");
    }
}

#[tokio::test]
async fn send_persists_notifies_and_pushes() {
    let (chat, service) = chat_between(true, at(0)).await;

    send(&service, chat.p, chat.q, "Hi").await;

    // live push attempted once
    assert_eq!(chat.delivery.pushes.load(Ordering::SeqCst), 1);

    // the receiver got a message notification naming the sender
    let notifications = chat.store.notifications_for(chat.q.id).await;
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind(), NotificationKind::Message);
    assert_eq!(notifications[0].message(), "New message from Priya");
    assert_eq!(
        notifications[0].link(),
        format!("/chat/{}", chat.p.id)
    );
}

#[tokio::test]
async fn offline_receivers_still_get_durable_messages() {
    let (chat, service) = chat_between(false, at(0)).await;

    send(&service, chat.p, chat.q, "are you there?").await;

    // push attempted and failed, message persisted anyway
    assert_eq!(chat.delivery.pushes.load(Ordering::SeqCst), 1);
    let conversation = service
        .get_conversation(chat.q, chat.p.id)
        .await
        .expect("conversation succeeds");
    assert_eq!(conversation.len(), 1);
    assert_eq!(conversation[0].content(), "are you there?");
}

#[tokio::test]
async fn inbox_tracks_multiple_counterparts() {
    let (chat, service) = chat_between(true, at(0)).await;
    let r = User::new(UserId::random(), "Ravi", Role::Renter).expect("valid user");
    chat.store.seed_user(r.clone()).await;

    send(&service, chat.p, chat.q, "to quinn").await;
    send(&service, r.principal(), chat.p, "to priya").await;

    let inbox = service.get_inbox(chat.p).await.expect("inbox succeeds");
    assert_eq!(inbox.len(), 2);
    let contents: Vec<&str> = inbox.iter().map(backend::domain::Message::content).collect();
    assert!(contents.contains(&"to quinn"));
    assert!(contents.contains(&"to priya"));
}
