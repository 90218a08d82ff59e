//! Menu configuration
//!
//! The fixed storefront menu: categories, sizes, milks, extras, and
//! the price tables the pricing engine reads. Everything here is data;
//! changing the menu means editing these tables, not the pricing code.

use rust_decimal::Decimal;

/// One tab of the storefront menu
#[derive(Debug, Clone, Copy)]
pub struct MenuCategory {
    pub key: &'static str,
    pub name: &'static str,
    pub coffees: &'static [&'static str],
}

pub const MENU_CATEGORIES: &[MenuCategory] = &[
    MenuCategory {
        key: "regular",
        name: "Regular Menu",
        coffees: &[
            "Cafe de Olla Latte",
            "Cinnamon Crunch Latte",
            "Dulce de Leche Latte",
            "Chocomil Latte",
            "Mazapan Latte",
            "Nutella Latte",
            "Banana Bean Late",
            "Biscoff Cookie Latte",
            "Fresas Y Crema Latte",
        ],
    },
    MenuCategory {
        key: "fall",
        name: "Fall Menu",
        coffees: &["Arroz Con Leche Latte", "Churro Jack-O-Latte", "Smores Latte"],
    },
    MenuCategory {
        key: "spooky",
        name: "Spooky Menu",
        coffees: &["Haunted Oreo Mazapan", "Bloody Besos", "Ghost Face"],
    },
    MenuCategory {
        key: "drea",
        name: "Drea's Secret Menu",
        coffees: &["Blvd latte", "A Town Latte"],
    },
];

pub const SIZE_OPTIONS: &[&str] = &["Regular (16oz)", "Large (24oz)"];

pub const MILK_OPTIONS: &[&str] = &[
    "Whole Milk",
    "Oat Milk",
    "Almond Milk",
    "Soy Milk",
    "Coconut Milk",
    "No Milk",
];

/// Display-only preference tags; they never affect price.
pub const EXTRA_OPTIONS: &[&str] = &["Hot", "Iced"];

/// Paid extras. "Extra Shot" is matched by prefix and counted per
/// occurrence; the flat extras are matched exactly and charged once.
pub const EXTRA_SHOT: &str = "Extra Shot";
pub const EXTRA_DRIZZLE: &str = "Extra Drizzle";
pub const EXTRA_COLD_FOAM: &str = "Extra Cold Foam";

/// Base price for a size, in currency units.
///
/// Unknown sizes return `None`; the pricing engine treats that as a
/// zero base price rather than an error.
pub fn size_price(size: &str) -> Option<Decimal> {
    match size {
        "Regular (16oz)" => Some(Decimal::from(7)),
        "Large (24oz)" => Some(Decimal::from(9)),
        _ => None,
    }
}

/// Per-shot surcharge ($1.00)
pub fn shot_price() -> Decimal {
    Decimal::ONE
}

/// Flat surcharge for drizzle or cold foam ($0.50)
pub fn flat_extra_price() -> Decimal {
    Decimal::new(50, 2)
}

pub fn is_known_coffee(name: &str) -> bool {
    MENU_CATEGORIES
        .iter()
        .any(|c| c.coffees.contains(&name))
}

pub fn is_known_size(size: &str) -> bool {
    SIZE_OPTIONS.contains(&size)
}

pub fn is_known_milk(milk: &str) -> bool {
    MILK_OPTIONS.contains(&milk)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_prices() {
        assert_eq!(size_price("Regular (16oz)"), Some(Decimal::from(7)));
        assert_eq!(size_price("Large (24oz)"), Some(Decimal::from(9)));
        assert_eq!(size_price("Venti"), None);
    }

    #[test]
    fn test_menu_lookups() {
        assert!(is_known_coffee("Mazapan Latte"));
        assert!(is_known_coffee("Ghost Face"));
        assert!(!is_known_coffee("Flat White"));
        assert!(is_known_milk("No Milk"));
        assert!(!is_known_size("Small (8oz)"));
    }
}
