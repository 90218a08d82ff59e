//! Besos Storefront - coffee shop ordering core
//!
//! # Architecture overview
//!
//! The hosted relational store owns the `orders` table; this crate is
//! everything around it:
//!
//! - **Menu & pricing** (`menu`, `pricing`): the fixed menu and the
//!   single price calculator every surface goes through
//! - **Ordering** (`ordering`): draft composition, validation, pickup
//!   slots, and submission
//! - **Order board** (`orders`): the staff dashboard's reconciled
//!   pending/historical caches over the realtime feed
//! - **Confirmation** (`confirmation`): the customer's post-order
//!   status screen and arrival announcement
//! - **Admin** (`admin`): complete / cancel / edit actions
//!
//! # Module structure
//!
//! ```text
//! storefront/src/
//! ├── core/          # configuration
//! ├── menu.rs        # menu data and price tables
//! ├── pricing/       # price calculator
//! ├── ordering/      # draft orders, slots, submission
//! ├── orders/        # views and the staff board
//! ├── realtime/      # change event fan-out
//! ├── store/         # record store (HTTP + in-memory)
//! ├── storage/       # device-local KV (redb)
//! ├── confirmation.rs
//! ├── admin.rs
//! └── utils/         # logging
//! ```

pub mod admin;
pub mod confirmation;
pub mod core;
pub mod menu;
pub mod ordering;
pub mod orders;
pub mod pricing;
pub mod realtime;
pub mod storage;
pub mod store;
pub mod utils;

// Re-export common types
pub use confirmation::{ArrivalAck, ConfirmationError};
pub use crate::core::Config;
pub use ordering::{CustomerInfo, DraftOrder, ItemDraft, SubmitError};
pub use orders::{Membership, OrderBoard, OrderView, ViewEffect};
pub use realtime::OrderFeed;
pub use storage::{ConfirmationStore, DeviceStorage, RedbStorage, StorageError};
pub use store::{HttpStore, MemoryStore, RecordStore, StoreError, StoreResult};
pub use utils::init_logger;

// Re-export the shared domain types alongside
pub use shared::{ChangeEvent, NewOrder, OrderItem, OrderPatch, OrderRecord, OrderStatus};
