//! Order composition and submission
//!
//! The customer side of the storefront: build up a draft order line by
//! line, validate it as a whole, and submit it to the store. Prices
//! are stamped by the pricing engine at the moment a line is added;
//! nothing here accepts a caller-supplied price.

pub mod slots;
pub mod submit;

use crate::menu;
use crate::pricing;
use chrono::{DateTime, Utc};
use shared::ValidationErrors;
use shared::models::{CleanItem, NewOrder, OrderItem, OrderStatus};
use shared::util::now_millis;

pub use slots::{SlotConfig, pickup_slots, validate_pickup_time};
pub use submit::{SubmitError, submit_order};

/// Customer contact details for an order
#[derive(Debug, Clone, Default)]
pub struct CustomerInfo {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

impl CustomerInfo {
    /// Display name as stored on the order row
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    fn validate_into(&self, errors: &mut ValidationErrors) {
        errors.require("first_name", &self.first_name, "First name is required");
        errors.require("last_name", &self.last_name, "Last name is required");
        errors.require("phone", &self.phone, "Phone number is required");
    }
}

/// One coffee being configured, before it becomes an order line
#[derive(Debug, Clone)]
pub struct ItemDraft {
    pub coffee_type: String,
    pub size: String,
    pub milk: String,
    pub extras: Vec<String>,
    pub quantity: u32,
    pub notes: String,
}

impl Default for ItemDraft {
    fn default() -> Self {
        Self {
            coffee_type: String::new(),
            size: String::new(),
            milk: "Whole Milk".to_string(),
            extras: Vec::new(),
            quantity: 1,
            notes: String::new(),
        }
    }
}

impl ItemDraft {
    /// Toggle a tag on or off.
    ///
    /// Covers display tags ("Hot", "Iced") and the flat paid extras;
    /// shots are additive, use [`add_extra_shot`](Self::add_extra_shot).
    pub fn toggle_extra(&mut self, name: &str) {
        match self.extras.iter().position(|e| e == name) {
            Some(pos) => {
                self.extras.remove(pos);
            }
            None => self.extras.push(name.to_string()),
        }
    }

    /// Add one more espresso shot
    pub fn add_extra_shot(&mut self) {
        self.extras.push(menu::EXTRA_SHOT.to_string());
    }

    /// Remove all espresso shots (the form's checkbox unchecks them
    /// as a group)
    pub fn clear_extra_shots(&mut self) {
        self.extras.retain(|e| e != menu::EXTRA_SHOT);
    }

    /// Current unit price of this configuration
    pub fn unit_price(&self) -> f64 {
        pricing::unit_price(&self.size, &self.extras)
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("coffee_type", &self.coffee_type, "Choose a coffee");
        if !self.coffee_type.trim().is_empty() && !menu::is_known_coffee(&self.coffee_type) {
            errors.push("coffee_type", "That coffee is not on the menu");
        }
        errors.require("size", &self.size, "Choose a size");
        if !self.size.trim().is_empty() && !menu::is_known_size(&self.size) {
            errors.push("size", "Unknown size");
        }
        errors.require("milk", &self.milk, "Choose a milk");
        if !self.milk.trim().is_empty() && !menu::is_known_milk(&self.milk) {
            errors.push("milk", "Unknown milk");
        }
        if self.quantity == 0 {
            errors.push("quantity", "Quantity must be at least 1");
        }
        errors.into_result()
    }

    /// Finalize the draft into an order line, stamping the client id
    /// and the engine's unit price.
    pub fn into_item(self) -> Result<OrderItem, ValidationErrors> {
        self.validate()?;
        let price = self.unit_price();
        Ok(OrderItem {
            id: now_millis(),
            coffee_type: self.coffee_type,
            size: self.size,
            milk: self.milk,
            extras: self.extras,
            price,
            quantity: self.quantity,
            notes: if self.notes.trim().is_empty() {
                None
            } else {
                Some(self.notes)
            },
        })
    }
}

/// A full order being composed by the customer
#[derive(Debug, Clone, Default)]
pub struct DraftOrder {
    pub customer: CustomerInfo,
    pub items: Vec<OrderItem>,
    pub pickup_time: Option<DateTime<Utc>>,
}

impl DraftOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a configured line to the order
    pub fn add_item(&mut self, draft: ItemDraft) -> Result<(), ValidationErrors> {
        self.items.push(draft.into_item()?);
        Ok(())
    }

    /// Remove a line by its client id; absent ids are ignored
    pub fn remove_item(&mut self, id: i64) {
        self.items.retain(|i| i.id != id);
    }

    /// Running total, recomputed from the lines
    pub fn total(&self) -> f64 {
        pricing::order_total(&self.items)
    }

    /// Validate the order as a whole
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        self.customer.validate_into(&mut errors);
        if self.items.is_empty() {
            errors.push("items", "Add at least one coffee to your order");
        }
        if self.pickup_time.is_none() {
            errors.push("pickup_time", "Choose a pickup time");
        }
        errors.into_result()
    }

    /// Build the insert payload.
    ///
    /// Client line ids are stripped and the total is recomputed; the
    /// store never sees client-only state or a caller-supplied total.
    pub fn to_new_order(&self) -> Result<NewOrder, ValidationErrors> {
        self.validate()?;
        Ok(NewOrder {
            name: self.customer.full_name(),
            user_phone_number: self.customer.phone.trim().to_string(),
            items: self.items.iter().map(CleanItem::from).collect(),
            total: self.total(),
            status: OrderStatus::Pending,
            pickup_time: self.pickup_time,
        })
    }
}
