//! Shared domain types for the storefront
//!
//! This crate holds the types that cross module boundaries:
//!
//! - **models** (`models`): order records, line items, insert/update payloads
//! - **events** (`event`): row-level change events from the hosted store
//! - **errors** (`error`): field-level validation errors
//! - **util** (`util`): time helpers and slot normalization
//!
//! No I/O happens here; everything is plain data plus serde.

pub mod error;
pub mod event;
pub mod models;
pub mod util;

// Re-export common types
pub use error::{FieldError, ValidationErrors};
pub use event::{ChangeEvent, ChangePayload, ChangeType, EventError};
pub use models::{CleanItem, NewOrder, OrderItem, OrderPatch, OrderRecord, OrderStatus};
