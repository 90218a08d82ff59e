//! In-memory record store
//!
//! Test double for the hosted store. Keeps rows behind a mutex, hands
//! out server-assigned ids, and (when wired to an [`OrderFeed`])
//! publishes the same change events the realtime channel would, so
//! reconciliation paths can be exercised end to end without a network.

use crate::realtime::OrderFeed;
use crate::store::{RecordStore, StoreError, StoreResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::event::ChangeEvent;
use shared::models::{NewOrder, OrderItem, OrderPatch, OrderRecord, OrderStatus};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
struct Inner {
    rows: Vec<OrderRecord>,
    next_id: i64,
}

/// In-memory implementation of [`RecordStore`]
#[derive(Debug)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    feed: Option<OrderFeed>,
    /// Set to simulate an unreachable store
    outage: Mutex<Option<String>>,
    calls: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                rows: Vec::new(),
                next_id: 1,
            }),
            feed: None,
            outage: Mutex::new(None),
            calls: AtomicU64::new(0),
        }
    }

    /// Publish change events for every write to `feed`
    pub fn with_feed(mut self, feed: OrderFeed) -> Self {
        self.feed = Some(feed);
        self
    }

    /// Insert a row directly, bypassing id assignment and the feed
    pub fn seed(&self, record: OrderRecord) {
        let mut inner = self.lock();
        inner.next_id = inner.next_id.max(record.id + 1);
        inner.rows.push(record);
    }

    /// Make every subsequent call fail with [`StoreError::Unavailable`]
    pub fn set_outage(&self, reason: impl Into<String>) {
        *self.lock_outage() = Some(reason.into());
    }

    /// Restore service after [`set_outage`](Self::set_outage)
    pub fn clear_outage(&self) {
        *self.lock_outage() = None;
    }

    /// How many store calls have been made, including failed ones
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Snapshot of all rows, in insertion order
    pub fn rows(&self) -> Vec<OrderRecord> {
        self.lock().rows.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn lock_outage(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        match self.outage.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn check_available(&self) -> StoreResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.lock_outage().as_ref() {
            Some(reason) => Err(StoreError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }

    fn publish(&self, event: ChangeEvent) {
        if let Some(feed) = &self.feed {
            feed.publish(event);
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn select_pending(&self) -> StoreResult<Vec<OrderRecord>> {
        self.check_available()?;
        let mut rows: Vec<OrderRecord> = self
            .lock()
            .rows
            .iter()
            .filter(|r| r.status == OrderStatus::Pending)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn select_historical(&self, since: DateTime<Utc>) -> StoreResult<Vec<OrderRecord>> {
        self.check_available()?;
        let mut rows: Vec<OrderRecord> = self
            .lock()
            .rows
            .iter()
            .filter(|r| r.status.is_terminal() && r.created_at >= since)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn fetch_order(&self, id: i64) -> StoreResult<OrderRecord> {
        self.check_available()?;
        self.lock()
            .rows
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn insert_order(&self, order: &NewOrder) -> StoreResult<OrderRecord> {
        self.check_available()?;
        let record = {
            let mut inner = self.lock();
            let id = inner.next_id;
            inner.next_id += 1;
            let record = OrderRecord {
                id,
                name: order.name.clone(),
                user_phone_number: order.user_phone_number.clone(),
                items: order.items.iter().cloned().map(OrderItem::from).collect(),
                total: order.total,
                status: order.status,
                pickup_time: order.pickup_time,
                created_at: Utc::now(),
                customer_arrived: false,
                arrived_at: None,
                cancellation_reason: None,
            };
            inner.rows.push(record.clone());
            record
        };
        self.publish(ChangeEvent::Insert(record.clone()));
        Ok(record)
    }

    async fn update_order(&self, id: i64, patch: &OrderPatch) -> StoreResult<OrderRecord> {
        self.check_available()?;
        let record = {
            let mut inner = self.lock();
            let row = inner
                .rows
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or(StoreError::NotFound(id))?;
            patch.apply_to(row);
            row.clone()
        };
        self.publish(ChangeEvent::Update(record.clone()));
        Ok(record)
    }
}
