//! Line item price calculation
//!
//! Rules:
//! - Base price = size table lookup; unknown size prices at zero
//!   (no error; legacy behavior preserved on purpose)
//! - Each extra whose name starts with "Extra Shot" adds the per-shot
//!   surcharge (counted, uncapped)
//! - "Extra Drizzle" and "Extra Cold Foam" add a flat surcharge each,
//!   at most once regardless of duplicate tags
//! - Any other tag is display-only and free
//!
//! Uses rust_decimal for precision calculations.

use rust_decimal::prelude::*;
use shared::models::OrderItem;

use crate::menu;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

fn shot_count(extras: &[String]) -> usize {
    extras.iter().filter(|e| e.starts_with(menu::EXTRA_SHOT)).count()
}

fn has_extra(extras: &[String], name: &str) -> bool {
    extras.iter().any(|e| e == name)
}

/// Unit price for one coffee of the given size with the given extras.
///
/// Pure and order-independent: permuting `extras` never changes the
/// result, and duplicate flat extras do not double-charge.
pub fn unit_price(size: &str, extras: &[String]) -> f64 {
    let base = menu::size_price(size).unwrap_or(Decimal::ZERO);

    let shots = Decimal::from(shot_count(extras) as u64) * menu::shot_price();

    let mut flat = Decimal::ZERO;
    if has_extra(extras, menu::EXTRA_DRIZZLE) {
        flat += menu::flat_extra_price();
    }
    if has_extra(extras, menu::EXTRA_COLD_FOAM) {
        flat += menu::flat_extra_price();
    }

    to_f64(base + shots + flat)
}

/// Price of a whole order line: unit price times quantity.
pub fn line_total(size: &str, extras: &[String], quantity: u32) -> f64 {
    to_f64(to_decimal(unit_price(size, extras)) * Decimal::from(quantity))
}

/// Order total: sum over items of stamped unit price times quantity.
///
/// Always recomputed from the items; callers must never trust a total
/// cached alongside them.
pub fn order_total(items: &[OrderItem]) -> f64 {
    let sum = items
        .iter()
        .map(|i| to_decimal(i.price) * Decimal::from(i.quantity))
        .sum::<Decimal>();
    to_f64(sum)
}

/// Human-readable breakdown of a line item's price, one line per
/// component, for order summaries and receipts.
pub fn price_breakdown(item: &OrderItem) -> Vec<String> {
    let mut lines = Vec::new();

    let base = menu::size_price(&item.size).unwrap_or(Decimal::ZERO);
    lines.push(format!("{}: ${:.2}", item.size, to_f64(base)));

    let shots = shot_count(&item.extras);
    if shots > 0 {
        let amount = Decimal::from(shots as u64) * menu::shot_price();
        if shots > 1 {
            lines.push(format!("Extra Shots ({}): ${:.2}", shots, to_f64(amount)));
        } else {
            lines.push(format!("Extra Shot: ${:.2}", to_f64(amount)));
        }
    }

    if has_extra(&item.extras, menu::EXTRA_DRIZZLE) {
        lines.push(format!(
            "Extra Drizzle: ${:.2}",
            to_f64(menu::flat_extra_price())
        ));
    }
    if has_extra(&item.extras, menu::EXTRA_COLD_FOAM) {
        lines.push(format!(
            "Extra Cold Foam: ${:.2}",
            to_f64(menu::flat_extra_price())
        ));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extras(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_base_prices() {
        assert_eq!(unit_price("Regular (16oz)", &[]), 7.0);
        assert_eq!(unit_price("Large (24oz)", &[]), 9.0);
    }

    #[test]
    fn test_unknown_size_prices_at_zero() {
        // Legacy behavior: an unrecognized size is silently $0, so the
        // only charge left is the extras.
        assert_eq!(unit_price("Venti", &[]), 0.0);
        assert_eq!(unit_price("Venti", &extras(&["Extra Shot"])), 1.0);
    }

    #[test]
    fn test_shots_are_counted() {
        // Regular $7 + 2 shots * $1 + drizzle $0.50 = $9.50
        let e = extras(&["Extra Shot", "Extra Shot", "Extra Drizzle"]);
        assert_eq!(unit_price("Regular (16oz)", &e), 9.5);
    }

    #[test]
    fn test_flat_extras_charge_once() {
        // Duplicate drizzle tags must not double-charge
        let e = extras(&["Extra Drizzle", "Extra Drizzle", "Extra Cold Foam"]);
        assert_eq!(unit_price("Regular (16oz)", &e), 8.0);
    }

    #[test]
    fn test_display_tags_are_free() {
        let e = extras(&["Iced", "Hot"]);
        assert_eq!(unit_price("Large (24oz)", &e), 9.0);
    }

    #[test]
    fn test_unit_price_is_order_independent() {
        let a = extras(&["Extra Shot", "Extra Drizzle", "Iced", "Extra Shot"]);
        let b = extras(&["Iced", "Extra Shot", "Extra Shot", "Extra Drizzle"]);
        assert_eq!(unit_price("Regular (16oz)", &a), unit_price("Regular (16oz)", &b));
    }

    #[test]
    fn test_line_total_is_unit_times_quantity() {
        let e = extras(&["Extra Shot", "Extra Cold Foam"]);
        for quantity in 1..=5 {
            assert_eq!(
                line_total("Large (24oz)", &e, quantity),
                to_f64(to_decimal(unit_price("Large (24oz)", &e)) * Decimal::from(quantity))
            );
        }
    }

    #[test]
    fn test_order_total_sums_lines() {
        let items = vec![
            OrderItem {
                id: 1,
                coffee_type: "Mazapan Latte".to_string(),
                size: "Regular (16oz)".to_string(),
                milk: "Whole Milk".to_string(),
                extras: vec![],
                price: 7.0,
                quantity: 2,
                notes: None,
            },
            OrderItem {
                id: 2,
                coffee_type: "Ghost Face".to_string(),
                size: "Large (24oz)".to_string(),
                milk: "Oat Milk".to_string(),
                extras: extras(&["Extra Shot"]),
                price: 10.0,
                quantity: 1,
                notes: None,
            },
        ];
        assert_eq!(order_total(&items), 24.0);
    }

    #[test]
    fn test_breakdown_lines() {
        let item = OrderItem {
            id: 1,
            coffee_type: "Mazapan Latte".to_string(),
            size: "Regular (16oz)".to_string(),
            milk: "Whole Milk".to_string(),
            extras: extras(&["Extra Shot", "Extra Shot", "Extra Drizzle"]),
            price: 9.5,
            quantity: 1,
            notes: None,
        };
        let lines = price_breakdown(&item);
        assert_eq!(
            lines,
            vec![
                "Regular (16oz): $7.00",
                "Extra Shots (2): $2.00",
                "Extra Drizzle: $0.50",
            ]
        );
    }
}
