//! End-to-end order flow tests
//!
//! Exercise the customer and staff paths together over the in-memory
//! store and the realtime feed: place an order, watch the board
//! reconcile it, announce arrival, and settle it.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Utc;
use storefront::confirmation::{self, ArrivalAck};
use storefront::ordering::{CustomerInfo, DraftOrder, ItemDraft, SubmitError, submit_order};
use storefront::storage::{ConfirmationStore, DeviceStorage, MemoryStorage};
use storefront::{
    Config, MemoryStore, OrderBoard, OrderFeed, OrderStatus, RecordStore, admin,
};

fn config() -> Config {
    Config::with_store("http://localhost:54321", "test")
}

fn valid_draft() -> DraftOrder {
    let mut draft = DraftOrder::new();
    draft.customer = CustomerInfo {
        first_name: "Maria".into(),
        last_name: "Lopez".into(),
        phone: "555-0100".into(),
    };
    draft.pickup_time = Some(Utc::now() + chrono::Duration::minutes(30));
    draft
        .add_item(ItemDraft {
            coffee_type: "Mazapan Latte".into(),
            size: "Large (24oz)".into(),
            extras: vec!["Extra Shot".into(), "Extra Drizzle".into()],
            ..Default::default()
        })
        .unwrap();
    draft
}

fn confirmation_store() -> (Arc<MemoryStorage>, ConfirmationStore) {
    let storage = Arc::new(MemoryStorage::new());
    let store = ConfirmationStore::new(storage.clone(), "besos_order_confirmation");
    (storage, store)
}

#[tokio::test]
async fn placed_order_flows_to_the_board_and_settles() {
    let feed = OrderFeed::new(64);
    let store = Arc::new(MemoryStore::new().with_feed(feed.clone()));
    let (_storage, confirmation) = confirmation_store();

    let board = OrderBoard::new(store.clone(), &config());
    board.refresh().await;
    let mut events = feed.subscribe();

    // Customer places an order: $9 large + $1 shot + $0.50 drizzle
    let record = submit_order(store.as_ref(), &confirmation, &valid_draft())
        .await
        .unwrap();
    assert_eq!(record.total, 10.5);
    assert_eq!(record.name, "Maria Lopez");

    // The board picks it up from the feed
    board.apply(&events.recv().await.unwrap());
    assert_eq!(board.pending().len(), 1);
    assert!(board.historical_page(0).is_empty());

    // Staff completes it; the same event moves it between views
    admin::complete_order(store.as_ref(), record.id).await.unwrap();
    board.apply(&events.recv().await.unwrap());
    assert!(board.pending().is_empty());
    assert_eq!(board.historical_page(0)[0].id, record.id);
    assert_eq!(board.historical_page(0)[0].status, OrderStatus::Completed);
}

#[tokio::test]
async fn invalid_draft_makes_no_store_call() {
    let store = MemoryStore::new();
    let (_storage, confirmation) = confirmation_store();

    let mut draft = valid_draft();
    draft.customer.first_name = "   ".into();

    let err = submit_order(&store, &confirmation, &draft).await.unwrap_err();
    let SubmitError::Invalid(errors) = err else {
        panic!("expected validation failure");
    };
    assert_eq!(errors.get("first_name"), Some("First name is required"));
    assert_eq!(store.call_count(), 0);
    assert!(confirmation.load().unwrap().is_none());
}

#[tokio::test]
async fn confirmation_snapshot_carries_the_server_id() {
    let store = MemoryStore::new();
    for _ in 0..41 {
        store
            .insert_order(&valid_draft().to_new_order().unwrap())
            .await
            .unwrap();
    }
    let (storage, confirmation) = confirmation_store();

    let record = submit_order(&store, &confirmation, &valid_draft())
        .await
        .unwrap();
    assert_eq!(record.id, 42);

    let raw = storage
        .get("besos_order_confirmation")
        .unwrap()
        .expect("snapshot written");
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["id"], 42);
    assert_eq!(json["status"], "pending");
}

#[tokio::test]
async fn arrival_reaches_staff_and_cancellation_clears_the_device() {
    let feed = OrderFeed::new(64);
    let store = Arc::new(MemoryStore::new().with_feed(feed.clone()));
    let (_storage, confirmation) = confirmation_store();

    let alerts = Arc::new(AtomicUsize::new(0));
    let counter = alerts.clone();
    let board = OrderBoard::new(store.clone(), &config()).with_arrival_handler(Arc::new(
        move |record| {
            assert!(record.customer_arrived);
            counter.fetch_add(1, Ordering::SeqCst);
        },
    ));
    board.refresh().await;
    let mut events = feed.subscribe();

    let record = submit_order(store.as_ref(), &confirmation, &valid_draft())
        .await
        .unwrap();
    board.apply(&events.recv().await.unwrap());

    // "I'm Here" raises the flag and the staff alert fires once
    let ack = confirmation::notify_arrival(store.as_ref(), &confirmation, Utc::now())
        .await
        .unwrap();
    assert!(matches!(ack, ArrivalAck::Notified(_)));
    board.apply(&events.recv().await.unwrap());
    assert_eq!(alerts.load(Ordering::SeqCst), 1);

    // Staff cancels; the customer's device observes the event and
    // retires the snapshot
    admin::cancel_order(store.as_ref(), record.id, "machine broke down")
        .await
        .unwrap();
    let cancelled = events.recv().await.unwrap();
    board.apply(&cancelled);
    confirmation::observe(&confirmation, &cancelled).unwrap();

    assert!(confirmation.load().unwrap().is_none());
    assert!(board.pending().is_empty());
    assert_eq!(
        board.historical_page(0)[0].cancellation_reason.as_deref(),
        Some("machine broke down")
    );
    // no further arrival alerts fired
    assert_eq!(alerts.load(Ordering::SeqCst), 1);
}
