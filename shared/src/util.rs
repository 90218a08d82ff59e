//! Time helpers

use chrono::{DateTime, Utc};

/// Current time as epoch milliseconds
///
/// Used for client-generated line item ids.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Floor a timestamp to a slot boundary of the given granularity.
///
/// Booked pickup slots are compared at this granularity, so two
/// pickups inside the same slot collide even if their raw timestamps
/// differ by seconds.
pub fn floor_to_slot(at: DateTime<Utc>, slot_minutes: u32) -> DateTime<Utc> {
    let slot_secs = i64::from(slot_minutes.max(1)) * 60;
    let secs = at.timestamp();
    let floored = secs - secs.rem_euclid(slot_secs);
    DateTime::from_timestamp(floored, 0).unwrap_or(at)
}
