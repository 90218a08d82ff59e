//! Order submission flow

use crate::storage::ConfirmationStore;
use crate::store::{RecordStore, StoreError};
use crate::ordering::DraftOrder;
use shared::ValidationErrors;
use shared::models::OrderRecord;
use thiserror::Error;
use tracing::{info, warn};

/// Submission failures
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The draft failed validation; no store call was made
    #[error("order validation failed: {0}")]
    Invalid(#[from] ValidationErrors),

    /// The store rejected or failed the insert; nothing was persisted
    /// on the device either
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Validate and persist a draft order.
///
/// Validation runs before any network call, so an invalid draft never
/// reaches the store. On success the created row (with the server
/// assigned id) is written to the device confirmation snapshot; a
/// device write failure does not fail the submission, since the order
/// already exists and the status screen can recover it by id.
pub async fn submit_order(
    store: &dyn RecordStore,
    confirmation: &ConfirmationStore,
    draft: &DraftOrder,
) -> Result<OrderRecord, SubmitError> {
    let payload = draft.to_new_order()?;
    let record = store.insert_order(&payload).await?;
    info!(order_id = record.id, total = record.total, "order placed");

    if let Err(err) = confirmation.save(&record) {
        warn!(order_id = record.id, error = %err, "confirmation snapshot not saved");
    }

    Ok(record)
}
