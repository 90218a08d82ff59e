//! Domain models

pub mod order;

pub use order::{CleanItem, NewOrder, OrderItem, OrderPatch, OrderRecord, OrderStatus};
