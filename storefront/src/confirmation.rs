//! Customer confirmation screen flow
//!
//! After placing an order the device keeps a snapshot of it; this
//! module refreshes that snapshot against the store, raises the "I'm
//! Here" arrival flag, and retires the snapshot once the order reaches
//! a terminal status (or disappears server-side).

use crate::storage::{ConfirmationStore, StorageError};
use crate::store::{RecordStore, StoreError};
use chrono::{DateTime, Utc};
use shared::event::ChangeEvent;
use shared::models::{OrderPatch, OrderRecord};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ConfirmationError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Outcome of an arrival announcement
#[derive(Debug, Clone, PartialEq)]
pub enum ArrivalAck {
    /// No confirmed order on this device
    NoOrder,
    /// Arrival was already announced for this order
    AlreadyArrived,
    /// Arrival recorded; carries the updated row
    Notified(OrderRecord),
}

/// Current status of the confirmed order, freshly fetched.
///
/// Returns `None` when no snapshot exists or the order no longer
/// exists server-side (the stale snapshot is cleared). A terminal
/// order is returned one last time so the screen can show the final
/// status, but its snapshot is cleared.
pub async fn check_status(
    store: &dyn RecordStore,
    confirmation: &ConfirmationStore,
) -> Result<Option<OrderRecord>, ConfirmationError> {
    let Some(snapshot) = confirmation.load()? else {
        return Ok(None);
    };

    match store.fetch_order(snapshot.id).await {
        Ok(fresh) => {
            if fresh.status.is_terminal() {
                info!(order_id = fresh.id, status = ?fresh.status, "order settled, clearing snapshot");
                confirmation.clear()?;
            } else {
                confirmation.save(&fresh)?;
            }
            Ok(Some(fresh))
        }
        Err(StoreError::NotFound(id)) => {
            debug!(order_id = id, "confirmed order gone server-side, clearing snapshot");
            confirmation.clear()?;
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

/// Announce the customer's arrival for the confirmed order.
///
/// Sets `customer_arrived` and stamps `arrived_at`; the staff board
/// picks this up through the realtime feed. Announcing twice is
/// acknowledged without a second store write.
pub async fn notify_arrival(
    store: &dyn RecordStore,
    confirmation: &ConfirmationStore,
    now: DateTime<Utc>,
) -> Result<ArrivalAck, ConfirmationError> {
    let Some(snapshot) = confirmation.load()? else {
        return Ok(ArrivalAck::NoOrder);
    };
    if snapshot.customer_arrived {
        return Ok(ArrivalAck::AlreadyArrived);
    }

    let patch = OrderPatch {
        customer_arrived: Some(true),
        arrived_at: Some(now),
        ..Default::default()
    };
    let updated = store.update_order(snapshot.id, &patch).await?;
    info!(order_id = updated.id, "arrival announced");
    confirmation.save(&updated)?;
    Ok(ArrivalAck::Notified(updated))
}

/// Reconcile the snapshot with a change event from the feed.
///
/// Events for other orders are ignored. An update keeps the snapshot
/// current; a terminal status or a delete retires it.
pub fn observe(
    confirmation: &ConfirmationStore,
    event: &ChangeEvent,
) -> Result<(), ConfirmationError> {
    let Some(snapshot) = confirmation.load()? else {
        return Ok(());
    };
    if event.order_id() != snapshot.id {
        return Ok(());
    }

    match event {
        ChangeEvent::Insert(record) | ChangeEvent::Update(record) => {
            if record.status.is_terminal() {
                info!(order_id = record.id, status = ?record.status, "order settled, clearing snapshot");
                confirmation.clear()?;
            } else {
                confirmation.save(record)?;
            }
        }
        ChangeEvent::Delete(_) => {
            confirmation.clear()?;
        }
    }
    Ok(())
}
