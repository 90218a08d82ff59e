//! Staff order actions
//!
//! Completing, cancelling, and editing orders from the dashboard. All
//! writes go through the store; the board's views catch up via the
//! realtime feed rather than being mutated here.

use crate::pricing;
use crate::store::{RecordStore, StoreError};
use shared::models::{CleanItem, OrderItem, OrderPatch, OrderRecord};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum AdminError {
    /// Cancelling requires a reason for the customer
    #[error("a cancellation reason is required")]
    ReasonRequired,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Mark an order completed
pub async fn complete_order(
    store: &dyn RecordStore,
    id: i64,
) -> Result<OrderRecord, AdminError> {
    let patch = OrderPatch {
        status: Some(shared::models::OrderStatus::Completed),
        ..Default::default()
    };
    let record = store.update_order(id, &patch).await?;
    info!(order_id = id, "order completed");
    Ok(record)
}

/// Cancel an order with a reason shown to the customer.
///
/// An empty or whitespace reason is rejected before any store call.
pub async fn cancel_order(
    store: &dyn RecordStore,
    id: i64,
    reason: &str,
) -> Result<OrderRecord, AdminError> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(AdminError::ReasonRequired);
    }

    let patch = OrderPatch {
        status: Some(shared::models::OrderStatus::Cancelled),
        cancellation_reason: Some(reason.to_string()),
        ..Default::default()
    };
    let record = store.update_order(id, &patch).await?;
    info!(order_id = id, reason, "order cancelled");
    Ok(record)
}

/// Persist staff edits to an order's line items.
///
/// Every line is re-priced by the pricing engine and the total is
/// recomputed; whatever prices the edited items carried in are
/// discarded.
pub async fn save_order_edits(
    store: &dyn RecordStore,
    id: i64,
    items: Vec<OrderItem>,
) -> Result<OrderRecord, AdminError> {
    let repriced: Vec<OrderItem> = items
        .into_iter()
        .map(|mut item| {
            item.price = pricing::unit_price(&item.size, &item.extras);
            item
        })
        .collect();
    let total = pricing::order_total(&repriced);

    let patch = OrderPatch {
        items: Some(repriced.iter().map(CleanItem::from).collect()),
        total: Some(total),
        ..Default::default()
    };
    let record = store.update_order(id, &patch).await?;
    info!(order_id = id, total, "order edits saved");
    Ok(record)
}
