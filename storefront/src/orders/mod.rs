//! Order caches and reconciliation
//!
//! This module keeps the staff dashboard's in-memory order lists
//! consistent with the hosted store:
//!
//! - **view**: a pure reducer over (cache, change event) pairs, one
//!   cache per membership predicate (pending / historical)
//! - **board**: the subscriber context that owns both views, pumps the
//!   realtime feed into them, and fires the arrival alert
//!
//! The store is the sole source of truth; these caches are derived
//! state and are rebuilt wholesale on every bulk refresh.

pub mod board;
pub mod view;

pub use board::OrderBoard;
pub use view::{Membership, OrderView, ViewEffect};
