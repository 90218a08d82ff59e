//! Staff order board
//!
//! Owns the pending and historical views, bootstraps them from the
//! store, pumps the realtime feed into them, and raises the arrival
//! alert when a reducer step asks for it.

use crate::core::Config;
use crate::orders::view::{OrderView, ViewEffect};
use crate::realtime::OrderFeed;
use crate::store::RecordStore;
use chrono::{Duration, Utc};
use shared::event::ChangeEvent;
use shared::models::{OrderRecord, OrderStatus};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Historical view page size
pub const PAGE_SIZE: usize = 10;

/// Callback invoked when a customer announces arrival
pub type ArrivalHandler = Arc<dyn Fn(OrderRecord) + Send + Sync>;

struct BoardState {
    pending: OrderView,
    historical: OrderView,
    last_error: Option<String>,
}

/// Subscriber context for the staff dashboard
///
/// All accessors take `&self`; the views live behind one mutex so the
/// pump task and dashboard reads never observe a half-applied event.
pub struct OrderBoard {
    store: Arc<dyn RecordStore>,
    window_days: i64,
    state: Mutex<BoardState>,
    on_arrival: Option<ArrivalHandler>,
}

impl OrderBoard {
    pub fn new(store: Arc<dyn RecordStore>, config: &Config) -> Self {
        Self {
            store,
            window_days: config.history_window_days,
            state: Mutex::new(BoardState {
                pending: OrderView::pending(),
                historical: OrderView::historical(config.history_window_days),
                last_error: None,
            }),
            on_arrival: None,
        }
    }

    /// Register the arrival alert handler
    pub fn with_arrival_handler(mut self, handler: ArrivalHandler) -> Self {
        self.on_arrival = Some(handler);
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BoardState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Bulk-fetch both views from the store.
    ///
    /// On failure the previous caches are kept and the error is
    /// recorded; a stale board beats an empty one.
    pub async fn refresh(&self) {
        let since = Utc::now() - Duration::days(self.window_days);
        let fetched = tokio::try_join!(
            self.store.select_pending(),
            self.store.select_historical(since),
        );

        let now = Utc::now();
        let mut state = self.lock();
        match fetched {
            Ok((pending, historical)) => {
                state.pending.load(pending, now);
                state.historical.load(historical, now);
                state.last_error = None;
                debug!(
                    pending = state.pending.len(),
                    historical = state.historical.len(),
                    "board refreshed"
                );
            }
            Err(err) => {
                warn!(error = %err, "board refresh failed, keeping cached views");
                state.last_error = Some(err.to_string());
            }
        }
    }

    /// Apply one change event to both views and raise any effects
    pub fn apply(&self, event: &ChangeEvent) {
        let now = Utc::now();
        let effects = {
            let mut state = self.lock();
            let mut effects = state.pending.apply(event, now);
            effects.extend(state.historical.apply(event, now));
            effects
        };

        for effect in effects {
            match effect {
                ViewEffect::CustomerArrived(record) => {
                    info!(order_id = record.id, name = %record.name, "customer arrived");
                    if let Some(handler) = &self.on_arrival {
                        handler(record);
                    }
                }
            }
        }
    }

    /// Pump the realtime feed into the views until cancelled.
    ///
    /// Performs the initial refresh itself, after subscribing, so no
    /// event can fall between bootstrap and stream. A lagged receiver
    /// re-fetches instead of trusting a gapped stream.
    pub async fn run(&self, feed: &OrderFeed, cancel: CancellationToken) {
        let mut receiver = feed.subscribe();
        self.refresh().await;
        info!("order board running");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("order board stopping");
                    break;
                }
                event = receiver.recv() => match event {
                    Ok(event) => self.apply(&event),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "feed lagged, re-fetching views");
                        self.refresh().await;
                    }
                    Err(RecvError::Closed) => {
                        warn!("feed closed, order board stopping");
                        break;
                    }
                },
            }
        }
    }

    /// Pending orders, newest first
    pub fn pending(&self) -> Vec<OrderRecord> {
        self.lock().pending.records().to_vec()
    }

    /// Pending orders sorted by pickup time, soonest first; orders
    /// without a pickup time sort last
    pub fn pending_by_pickup(&self) -> Vec<OrderRecord> {
        let mut records = self.pending();
        records.sort_by_key(|r| (r.pickup_time.is_none(), r.pickup_time));
        records
    }

    /// One page of the historical view (zero-based)
    pub fn historical_page(&self, page: usize) -> Vec<OrderRecord> {
        let state = self.lock();
        state
            .historical
            .records()
            .iter()
            .skip(page * PAGE_SIZE)
            .take(PAGE_SIZE)
            .cloned()
            .collect()
    }

    /// Number of pages in the historical view (at least one)
    pub fn historical_page_count(&self) -> usize {
        self.lock().historical.len().div_ceil(PAGE_SIZE).max(1)
    }

    /// Error from the most recent refresh, if it failed
    pub fn last_error(&self) -> Option<String> {
        self.lock().last_error.clone()
    }

    /// Whether a pending order is past its pickup time with the
    /// customer still not here
    pub fn is_running_late(record: &OrderRecord, now: chrono::DateTime<Utc>) -> bool {
        record.status == OrderStatus::Pending
            && !record.customer_arrived
            && record.pickup_time.is_some_and(|pickup| pickup < now)
    }
}
