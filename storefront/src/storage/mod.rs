//! Device-local key-value storage
//!
//! The confirmation snapshot survives restarts on the customer's
//! device so the status screen can come back after a reload. The
//! contract is a small string KV surface; redb backs it on disk and a
//! mutex-guarded map backs it in tests.

pub mod redb_store;

use crate::core::Config;
use shared::models::OrderRecord;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::warn;

pub use redb_store::RedbStorage;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// String key-value storage on the customer's device
pub trait DeviceStorage: Send + Sync {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// In-memory [`DeviceStorage`] for tests
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl DeviceStorage for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.lock().remove(key);
        Ok(())
    }
}

/// Order confirmation snapshot on the device
///
/// One order at a time: placing a new order overwrites the previous
/// snapshot. A corrupt stored value is treated as absent and dropped
/// rather than surfaced as an error.
#[derive(Clone)]
pub struct ConfirmationStore {
    storage: Arc<dyn DeviceStorage>,
    key: String,
}

impl ConfirmationStore {
    pub fn new(storage: Arc<dyn DeviceStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Confirmation store on the configured device key
    pub fn from_config(storage: Arc<dyn DeviceStorage>, config: &Config) -> Self {
        Self::new(storage, config.confirmation_key.clone())
    }

    /// Persist the confirmed order
    pub fn save(&self, record: &OrderRecord) -> StorageResult<()> {
        let json = serde_json::to_string(record)?;
        self.storage.set(&self.key, &json)
    }

    /// Load the confirmed order, if any.
    ///
    /// Unparseable snapshots (older schema, truncated write) are
    /// removed and reported as absent.
    pub fn load(&self) -> StorageResult<Option<OrderRecord>> {
        let Some(json) = self.storage.get(&self.key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&json) {
            Ok(record) => Ok(Some(record)),
            Err(err) => {
                warn!(error = %err, "dropping unreadable confirmation snapshot");
                self.storage.remove(&self.key)?;
                Ok(None)
            }
        }
    }

    /// Remove the snapshot
    pub fn clear(&self) -> StorageResult<()> {
        self.storage.remove(&self.key)
    }

    /// Remove the snapshot when the stored order matches `predicate`.
    ///
    /// Returns whether a snapshot was removed.
    pub fn clear_if(&self, predicate: impl Fn(&OrderRecord) -> bool) -> StorageResult<bool> {
        match self.load()? {
            Some(record) if predicate(&record) => {
                self.clear()?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared::models::OrderStatus;

    fn record(id: i64, status: OrderStatus) -> OrderRecord {
        OrderRecord {
            id,
            name: "Ana".into(),
            user_phone_number: "555-0100".into(),
            items: vec![],
            total: 7.0,
            status,
            pickup_time: None,
            created_at: Utc::now(),
            customer_arrived: false,
            arrived_at: None,
            cancellation_reason: None,
        }
    }

    fn store() -> ConfirmationStore {
        ConfirmationStore::new(Arc::new(MemoryStorage::new()), "besos_order_confirmation")
    }

    #[test]
    fn save_load_clear_round_trip() {
        let store = store();
        assert!(store.load().unwrap().is_none());

        store.save(&record(42, OrderStatus::Pending)).unwrap();
        assert_eq!(store.load().unwrap().unwrap().id, 42);

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_overwrites_previous_snapshot() {
        let store = store();
        store.save(&record(1, OrderStatus::Pending)).unwrap();
        store.save(&record(2, OrderStatus::Pending)).unwrap();
        assert_eq!(store.load().unwrap().unwrap().id, 2);
    }

    #[test]
    fn corrupt_snapshot_is_dropped_not_an_error() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set("key", "{not valid json").unwrap();

        let store = ConfirmationStore::new(storage.clone(), "key");
        assert!(store.load().unwrap().is_none());
        // the bad value is gone
        assert!(storage.get("key").unwrap().is_none());
    }

    #[test]
    fn from_config_uses_the_configured_key() {
        let mut config = Config::with_store("http://localhost:54321", "test");
        config.confirmation_key = "custom_confirmation_key".into();

        let storage = Arc::new(MemoryStorage::new());
        let store = ConfirmationStore::from_config(storage.clone(), &config);
        store.save(&record(1, OrderStatus::Pending)).unwrap();

        assert!(storage.get("custom_confirmation_key").unwrap().is_some());
        assert!(storage.get("besos_order_confirmation").unwrap().is_none());
    }

    #[test]
    fn clear_if_matches_stored_order() {
        let store = store();
        store.save(&record(7, OrderStatus::Cancelled)).unwrap();

        assert!(!store.clear_if(|r| r.id == 99).unwrap());
        assert!(store.load().unwrap().is_some());

        assert!(store.clear_if(|r| r.status.is_terminal()).unwrap());
        assert!(store.load().unwrap().is_none());

        // nothing stored: predicate never runs
        assert!(!store.clear_if(|_| true).unwrap());
    }
}
