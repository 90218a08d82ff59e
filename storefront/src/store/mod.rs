//! Record store contract
//!
//! The hosted relational service owns the `orders` table; everything
//! in-process is a cache of it. This module defines the async contract
//! the rest of the crate consumes, the structured error shape the
//! service returns, and two implementations:
//!
//! - **http**: reqwest client against the service's REST surface
//! - **memory**: in-process store for tests, wired to the realtime
//!   feed so reconciliation paths can be exercised end to end

pub mod http;
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::models::{NewOrder, OrderPatch, OrderRecord};
use thiserror::Error;

pub use http::HttpStore;
pub use memory::MemoryStore;

/// Structured error body returned by the service
///
/// Mirrors the wire shape (`code`, `message`, `details`, `hint`); an
/// authorization-policy rejection arrives here with code `42501`.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl std::fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.code, &self.message) {
            (Some(code), Some(message)) => write!(f, "[{code}] {message}"),
            (None, Some(message)) => write!(f, "{message}"),
            (Some(code), None) => write!(f, "[{code}]"),
            (None, None) => write!(f, "unknown error"),
        }
    }
}

/// Store error type
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport-level failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service rejected the request with a structured error
    #[error("store rejected request ({status}): {body}")]
    Rejected { status: u16, body: ErrorBody },

    /// Response body did not match the expected shape
    #[error("invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A representation-returning write came back empty
    #[error("store returned no rows")]
    NoRows,

    /// No order row with the given id
    #[error("order not found: {0}")]
    NotFound(i64),

    /// Store unreachable (used by the in-memory test store)
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Async contract against the hosted `orders` table
///
/// All failures surface as [`StoreError`]; nothing is swallowed.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All orders with status `pending`, newest first
    async fn select_pending(&self) -> StoreResult<Vec<OrderRecord>>;

    /// Terminal orders created at or after `since`, newest first
    async fn select_historical(&self, since: DateTime<Utc>) -> StoreResult<Vec<OrderRecord>>;

    /// One order row by id
    async fn fetch_order(&self, id: i64) -> StoreResult<OrderRecord>;

    /// Persist a new order; returns the created row with server
    /// assigned `id` and `created_at`
    async fn insert_order(&self, order: &NewOrder) -> StoreResult<OrderRecord>;

    /// Partially update an order row; returns the updated row
    async fn update_order(&self, id: i64, patch: &OrderPatch) -> StoreResult<OrderRecord>;
}
