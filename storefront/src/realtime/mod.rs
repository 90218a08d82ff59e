//! Realtime change feed
//!
//! Fan-out of orders-table change events to any number of in-process
//! subscribers. The hosted store pushes row changes over its realtime
//! channel; whatever receives them (websocket task, test store)
//! publishes them here and every subscribed view reconciles
//! independently.

use crate::core::Config;
use shared::event::ChangeEvent;
use tokio::sync::broadcast;
use tracing::debug;

/// Broadcast bus for orders-table change events
///
/// Cloning is cheap; all clones share the same channel. Subscribers
/// that fall behind the channel capacity see a `Lagged` error on
/// `recv` and are expected to re-fetch from the store.
#[derive(Debug, Clone)]
pub struct OrderFeed {
    sender: broadcast::Sender<ChangeEvent>,
}

impl OrderFeed {
    /// Create a feed with the given channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Create a feed with the configured capacity
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.feed_capacity)
    }

    /// Subscribe to change events
    ///
    /// Only events published after this call are delivered.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }

    /// Publish a change event to all current subscribers
    ///
    /// Events published with no subscribers are dropped; that is fine,
    /// a late subscriber bootstraps with a bulk fetch anyway.
    pub fn publish(&self, event: ChangeEvent) {
        let receivers = self.sender.receiver_count();
        debug!(
            order_id = event.order_id(),
            receivers,
            "publishing change event"
        );
        let _ = self.sender.send(event);
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for OrderFeed {
    fn default() -> Self {
        Self::new(1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared::models::{OrderRecord, OrderStatus};

    fn record(id: i64) -> OrderRecord {
        OrderRecord {
            id,
            name: "Ana".into(),
            user_phone_number: "555-0100".into(),
            items: vec![],
            total: 7.0,
            status: OrderStatus::Pending,
            pickup_time: None,
            created_at: Utc::now(),
            customer_arrived: false,
            arrived_at: None,
            cancellation_reason: None,
        }
    }

    #[tokio::test]
    async fn delivers_to_all_subscribers() {
        let feed = OrderFeed::new(16);
        let mut a = feed.subscribe();
        let mut b = feed.subscribe();

        feed.publish(ChangeEvent::Insert(record(1)));

        assert_eq!(a.recv().await.unwrap().order_id(), 1);
        assert_eq!(b.recv().await.unwrap().order_id(), 1);
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_a_no_op() {
        let feed = OrderFeed::new(16);
        feed.publish(ChangeEvent::Insert(record(1)));

        // a subscriber joining afterwards sees nothing
        let mut rx = feed.subscribe();
        feed.publish(ChangeEvent::Insert(record(2)));
        assert_eq!(rx.recv().await.unwrap().order_id(), 2);
    }

    #[tokio::test]
    async fn slow_subscriber_observes_lag() {
        let mut config = Config::with_store("http://localhost:54321", "test");
        config.feed_capacity = 2;
        let feed = OrderFeed::from_config(&config);
        let mut rx = feed.subscribe();

        for id in 0..5 {
            feed.publish(ChangeEvent::Insert(record(id)));
        }

        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(_))
        ));
    }
}
