//! Order Model
//!
//! Row shapes for the hosted `orders` table. The store returns loosely
//! shaped JSON, so every optional column carries a defaulting rule and
//! coercion happens once at deserialization, not at each use site.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Completed and cancelled orders are terminal: staff no longer act
    /// on them and any device confirmation record should be cleared.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// One coffee configuration within an order
///
/// `extras` is a multiset of tag names: "Extra Shot" may repeat to
/// represent multiple shots, while flat extras ("Extra Drizzle",
/// "Extra Cold Foam") count at most once regardless of duplicates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    /// Client-generated id (millis timestamp), used only for list
    /// manipulation before submission. Never sent to the store.
    #[serde(default)]
    pub id: i64,
    pub coffee_type: String,
    pub size: String,
    pub milk: String,
    #[serde(default)]
    pub extras: Vec<String>,
    /// Unit price in currency units. Always the pricing engine's
    /// output for (size, extras); never edited independently.
    pub price: f64,
    pub quantity: u32,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Order row as stored by the hosted service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderRecord {
    /// Server-assigned id
    pub id: i64,
    /// Customer full name
    pub name: String,
    #[serde(default)]
    pub user_phone_number: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    /// Invariant: sum over items of price * quantity
    pub total: f64,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub pickup_time: Option<DateTime<Utc>>,
    /// Server-assigned creation timestamp
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub customer_arrived: bool,
    #[serde(default)]
    pub arrived_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cancellation_reason: Option<String>,
}

/// Line item as serialized for the store
///
/// Strips the transient client `id` and coerces `notes` to a plain
/// string, so the persisted row never carries client-only state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CleanItem {
    pub coffee_type: String,
    pub size: String,
    pub milk: String,
    pub extras: Vec<String>,
    pub price: f64,
    pub quantity: u32,
    pub notes: String,
}

impl From<&OrderItem> for CleanItem {
    fn from(item: &OrderItem) -> Self {
        Self {
            coffee_type: item.coffee_type.clone(),
            size: item.size.clone(),
            milk: item.milk.clone(),
            extras: item.extras.clone(),
            price: item.price,
            quantity: item.quantity.max(1),
            notes: item.notes.clone().unwrap_or_default(),
        }
    }
}

impl From<CleanItem> for OrderItem {
    fn from(item: CleanItem) -> Self {
        Self {
            id: 0,
            coffee_type: item.coffee_type,
            size: item.size,
            milk: item.milk,
            extras: item.extras,
            price: item.price,
            quantity: item.quantity,
            notes: if item.notes.is_empty() {
                None
            } else {
                Some(item.notes)
            },
        }
    }
}

/// Insert payload for a new order (no id / created_at; the store
/// assigns both)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub name: String,
    pub user_phone_number: String,
    pub items: Vec<CleanItem>,
    pub total: f64,
    pub status: OrderStatus,
    pub pickup_time: Option<DateTime<Utc>>,
}

/// Partial update payload; only set fields are serialized
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<CleanItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_arrived: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrived_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
}

impl OrderPatch {
    /// Apply the set fields to a record in place.
    ///
    /// This is the server-side merge semantics, used by the in-memory
    /// store so tests observe the same rows a real update would yield.
    pub fn apply_to(&self, record: &mut OrderRecord) {
        if let Some(name) = &self.name {
            record.name = name.clone();
        }
        if let Some(phone) = &self.user_phone_number {
            record.user_phone_number = phone.clone();
        }
        if let Some(items) = &self.items {
            record.items = items.iter().cloned().map(OrderItem::from).collect();
        }
        if let Some(total) = self.total {
            record.total = total;
        }
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(pickup) = self.pickup_time {
            record.pickup_time = Some(pickup);
        }
        if let Some(arrived) = self.customer_arrived {
            record.customer_arrived = arrived;
        }
        if let Some(at) = self.arrived_at {
            record.arrived_at = Some(at);
        }
        if let Some(reason) = &self.cancellation_reason {
            record.cancellation_reason = Some(reason.clone());
        }
    }
}
