//! Row-level change events
//!
//! The hosted store pushes one event per row change on a subscribed
//! channel. Delivery is unordered across rows and at-least-once, so
//! the same event may arrive twice; every consumer must be idempotent.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::OrderRecord;

/// Wire-level event kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeType {
    Insert,
    Update,
    Delete,
}

/// Event exactly as delivered on the channel
///
/// `new` carries the row state for inserts and updates; `old` carries
/// the removed row for deletes. The service guarantees nothing about
/// the other field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePayload {
    #[serde(rename = "eventType")]
    pub event_type: ChangeType,
    #[serde(default)]
    pub new: Option<OrderRecord>,
    #[serde(default)]
    pub old: Option<OrderRecord>,
}

/// Errors converting a wire payload into a typed event
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EventError {
    #[error("change event is missing its row: {0:?}")]
    MissingRow(ChangeType),
}

/// Typed change event, validated once at ingress
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEvent {
    Insert(OrderRecord),
    Update(OrderRecord),
    Delete(OrderRecord),
}

impl ChangeEvent {
    /// The row this event refers to (latest known state for insert and
    /// update, last known state for delete).
    pub fn record(&self) -> &OrderRecord {
        match self {
            Self::Insert(r) | Self::Update(r) | Self::Delete(r) => r,
        }
    }

    pub fn order_id(&self) -> i64 {
        self.record().id
    }
}

impl TryFrom<ChangePayload> for ChangeEvent {
    type Error = EventError;

    fn try_from(payload: ChangePayload) -> Result<Self, Self::Error> {
        let kind = payload.event_type;
        match kind {
            ChangeType::Insert => payload.new.map(Self::Insert),
            ChangeType::Update => payload.new.map(Self::Update),
            ChangeType::Delete => payload.old.map(Self::Delete),
        }
        .ok_or(EventError::MissingRow(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn row(id: i64) -> OrderRecord {
        OrderRecord {
            id,
            name: "Test".to_string(),
            user_phone_number: String::new(),
            items: vec![],
            total: 0.0,
            status: Default::default(),
            pickup_time: None,
            created_at: Utc::now(),
            customer_arrived: false,
            arrived_at: None,
            cancellation_reason: None,
        }
    }

    #[test]
    fn test_payload_event_type_wire_names() {
        let payload = ChangePayload {
            event_type: ChangeType::Insert,
            new: Some(row(1)),
            old: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["eventType"], "INSERT");
    }

    #[test]
    fn test_delete_uses_old_row() {
        let payload = ChangePayload {
            event_type: ChangeType::Delete,
            new: None,
            old: Some(row(9)),
        };
        let event = ChangeEvent::try_from(payload).unwrap();
        assert_eq!(event.order_id(), 9);
        assert!(matches!(event, ChangeEvent::Delete(_)));
    }

    #[test]
    fn test_missing_row_is_an_error() {
        let payload = ChangePayload {
            event_type: ChangeType::Update,
            new: None,
            old: Some(row(3)),
        };
        let err = ChangeEvent::try_from(payload).unwrap_err();
        assert_eq!(err, EventError::MissingRow(ChangeType::Update));
    }
}
