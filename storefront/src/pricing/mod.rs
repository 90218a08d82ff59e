//! Pricing Engine
//!
//! Single source of truth for line item pricing. The customer form
//! (add-time) and the staff edit form both go through
//! [`calculator::unit_price`]; there is deliberately no second copy of
//! the formula anywhere in the workspace.

pub mod calculator;

pub use calculator::{line_total, order_total, price_breakdown, unit_price};
