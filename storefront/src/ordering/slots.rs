//! Pickup slot selection
//!
//! Pickup times are offered at a fixed granularity between opening and
//! closing. A slot already booked by a pending order is not offered
//! again, and comparisons happen on floored timestamps so two pickups
//! seconds apart inside one slot still collide.

use crate::core::Config;
use chrono::{DateTime, Duration, Timelike, Utc};
use shared::ValidationErrors;
use shared::util::floor_to_slot;

/// Pickup window parameters
#[derive(Debug, Clone, Copy)]
pub struct SlotConfig {
    pub slot_minutes: u32,
    /// First bookable hour (inclusive)
    pub open_hour: u32,
    /// Hour the window closes (exclusive)
    pub close_hour: u32,
}

impl SlotConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            slot_minutes: config.slot_minutes,
            open_hour: config.open_hour,
            close_hour: config.close_hour,
        }
    }
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            slot_minutes: 10,
            open_hour: 7,
            close_hour: 19,
        }
    }
}

/// Offerable pickup slots for the rest of today.
///
/// Starts at opening (or the first slot after `now`, whichever is
/// later) and ends before closing; slots present in `booked` are
/// skipped.
pub fn pickup_slots(
    now: DateTime<Utc>,
    booked: &[DateTime<Utc>],
    config: SlotConfig,
) -> Vec<DateTime<Utc>> {
    let step = Duration::minutes(i64::from(config.slot_minutes.max(1)));
    let day_start = match now
        .with_hour(config.open_hour)
        .and_then(|t| t.with_minute(0))
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
    {
        Some(t) => t,
        None => return Vec::new(),
    };
    let close = day_start + Duration::hours(i64::from(
        config.close_hour.saturating_sub(config.open_hour),
    ));

    let taken: Vec<DateTime<Utc>> = booked
        .iter()
        .map(|t| floor_to_slot(*t, config.slot_minutes))
        .collect();

    let mut slots = Vec::new();
    let mut slot = day_start;
    while slot < close {
        if slot > now && !taken.contains(&slot) {
            slots.push(slot);
        }
        slot += step;
    }
    slots
}

/// Validate a customer-chosen pickup time against the window and the
/// already booked slots.
pub fn validate_pickup_time(
    at: DateTime<Utc>,
    now: DateTime<Utc>,
    booked: &[DateTime<Utc>],
    config: SlotConfig,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if at <= now {
        errors.push("pickup_time", "Pickup time must be in the future");
    }
    let hour = at.hour();
    if hour < config.open_hour || hour >= config.close_hour {
        errors.push("pickup_time", "Pickup time is outside opening hours");
    }

    let slot = floor_to_slot(at, config.slot_minutes);
    if booked
        .iter()
        .any(|t| floor_to_slot(*t, config.slot_minutes) == slot)
    {
        errors.push("pickup_time", "That pickup time was just taken");
    }

    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn test_slots_start_after_now() {
        let now = at("2025-10-01T08:55:00Z");
        let slots = pickup_slots(now, &[], SlotConfig::default());

        assert_eq!(slots[0], at("2025-10-01T09:00:00Z"));
        // every slot is strictly in the future
        assert!(slots.iter().all(|s| *s > now));
        // last slot is before closing
        assert_eq!(*slots.last().unwrap(), at("2025-10-01T18:50:00Z"));
    }

    #[test]
    fn test_slots_use_configured_granularity() {
        let now = at("2025-10-01T06:00:00Z");
        let slots = pickup_slots(now, &[], SlotConfig::default());

        assert_eq!(slots[0], at("2025-10-01T07:00:00Z"));
        assert_eq!(slots[1], at("2025-10-01T07:10:00Z"));
        assert_eq!(slots.len(), 12 * 6);
    }

    #[test]
    fn test_booked_slots_are_excluded() {
        let now = at("2025-10-01T06:00:00Z");
        // booked time is off-boundary; it still blocks its whole slot
        let booked = vec![at("2025-10-01T07:13:22Z")];
        let slots = pickup_slots(now, &booked, SlotConfig::default());

        assert!(!slots.contains(&at("2025-10-01T07:10:00Z")));
        assert!(slots.contains(&at("2025-10-01T07:00:00Z")));
        assert!(slots.contains(&at("2025-10-01T07:20:00Z")));
    }

    #[test]
    fn test_after_closing_no_slots() {
        let now = at("2025-10-01T19:05:00Z");
        assert!(pickup_slots(now, &[], SlotConfig::default()).is_empty());
    }

    #[test]
    fn test_validate_rejects_past_and_off_hours() {
        let now = at("2025-10-01T12:00:00Z");
        let config = SlotConfig::default();

        let err = validate_pickup_time(at("2025-10-01T11:00:00Z"), now, &[], config).unwrap_err();
        assert_eq!(err.get("pickup_time"), Some("Pickup time must be in the future"));

        let err = validate_pickup_time(at("2025-10-01T20:00:00Z"), now, &[], config).unwrap_err();
        assert_eq!(
            err.get("pickup_time"),
            Some("Pickup time is outside opening hours")
        );
    }

    #[test]
    fn test_validate_detects_collision_within_slot() {
        let now = at("2025-10-01T12:00:00Z");
        let config = SlotConfig::default();
        let booked = vec![at("2025-10-01T14:31:00Z")];

        let err =
            validate_pickup_time(at("2025-10-01T14:39:00Z"), now, &booked, config).unwrap_err();
        assert_eq!(err.get("pickup_time"), Some("That pickup time was just taken"));

        validate_pickup_time(at("2025-10-01T14:40:00Z"), now, &booked, config).unwrap();
    }
}
