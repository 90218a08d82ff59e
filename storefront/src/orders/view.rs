//! Order view reducer
//!
//! An [`OrderView`] is an ordered cache of order rows plus a
//! membership predicate. Applying a change event is a pure function of
//! (current cache, event, now): no ordering assumptions between the
//! bulk fetch and the stream, no reliance on per-row delivery order,
//! and replaying any event is a no-op the second time.

use chrono::{DateTime, Duration, Utc};
use shared::event::ChangeEvent;
use shared::models::{OrderRecord, OrderStatus};
use tracing::debug;

/// Membership predicate for a view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    /// Orders awaiting staff action
    Pending,
    /// Terminal orders created within the recency window
    Historical { window_days: i64 },
}

impl Membership {
    /// Whether a row belongs in a view with this predicate.
    ///
    /// `now` is passed in rather than read from the clock so event
    /// application stays a pure function and tests can pin time.
    pub fn admits(&self, record: &OrderRecord, now: DateTime<Utc>) -> bool {
        match self {
            Self::Pending => record.status == OrderStatus::Pending,
            Self::Historical { window_days } => {
                record.status.is_terminal()
                    && record.created_at >= now - Duration::days(*window_days)
            }
        }
    }
}

/// Side effect requested by a reducer step, handled out of band by the
/// owning context.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEffect {
    /// `customer_arrived` flipped false -> true relative to the
    /// previously cached row; fire the staff alert exactly once.
    CustomerArrived(OrderRecord),
}

/// Ordered cache of order rows behind one membership predicate
///
/// Ordering is most-recent-first for stream inserts and fetch order
/// for bulk loads; membership, not position, is the invariant.
#[derive(Debug, Clone)]
pub struct OrderView {
    membership: Membership,
    records: Vec<OrderRecord>,
}

impl OrderView {
    pub fn new(membership: Membership) -> Self {
        Self {
            membership,
            records: Vec::new(),
        }
    }

    /// View of all pending orders
    pub fn pending() -> Self {
        Self::new(Membership::Pending)
    }

    /// View of completed/cancelled orders from the last `window_days`
    pub fn historical(window_days: i64) -> Self {
        Self::new(Membership::Historical { window_days })
    }

    pub fn membership(&self) -> Membership {
        self.membership
    }

    pub fn records(&self) -> &[OrderRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: i64) -> Option<&OrderRecord> {
        self.position(id).map(|i| &self.records[i])
    }

    fn position(&self, id: i64) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    /// Seed the view from a bulk fetch, replacing current contents.
    ///
    /// Rows are re-checked against the predicate on ingress; the
    /// server-side filter is not trusted to match it exactly (the
    /// recency window in particular drifts between fetch and use).
    pub fn load(&mut self, records: Vec<OrderRecord>, now: DateTime<Utc>) {
        self.records = records
            .into_iter()
            .filter(|r| self.membership.admits(r, now))
            .collect();
        debug!(count = self.records.len(), view = ?self.membership, "view loaded");
    }

    /// Apply one change event, returning any side effects.
    ///
    /// Safe against duplicate delivery and events for rows this view
    /// has never seen.
    pub fn apply(&mut self, event: &ChangeEvent, now: DateTime<Utc>) -> Vec<ViewEffect> {
        match event {
            ChangeEvent::Insert(record) => {
                if self.membership.admits(record, now) && !self.contains(record.id) {
                    self.records.insert(0, record.clone());
                }
                vec![]
            }
            ChangeEvent::Update(record) => self.apply_update(record, now),
            ChangeEvent::Delete(record) => {
                if let Some(pos) = self.position(record.id) {
                    self.records.remove(pos);
                }
                vec![]
            }
        }
    }

    fn apply_update(&mut self, record: &OrderRecord, now: DateTime<Utc>) -> Vec<ViewEffect> {
        let mut effects = Vec::new();

        if !self.membership.admits(record, now) {
            // Row left this view (or was never in it)
            if let Some(pos) = self.position(record.id) {
                self.records.remove(pos);
            }
            return effects;
        }

        match self.position(record.id) {
            Some(pos) => {
                // Arrival detection needs the prior cached value, so
                // compare before overwriting.
                let prior = &self.records[pos];
                if !prior.customer_arrived && record.customer_arrived {
                    effects.push(ViewEffect::CustomerArrived(record.clone()));
                }
                self.records[pos] = record.clone();
            }
            None => {
                // Transition INTO membership, e.g. an order that just
                // completed appearing in the historical view.
                self.records.insert(0, record.clone());
            }
        }

        effects
    }
}
