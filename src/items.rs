//! Items

use serde::{Deserialize, Serialize};

use crate::{
    menu::{MenuItem, MenuItemId},
    pricing::{line_total, unit_price},
};

/// A line item: one distinct selection in a cart or a completed order.
///
/// Name and base price are copied from the menu when the line is created, so
/// later catalog edits never reprice a cart in progress or an order already
/// placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Menu item this line was created from
    pub item_id: MenuItemId,

    /// Display name at the time the line was created
    pub name: String,

    /// Base price at the time the line was created
    pub base_price: u64,

    /// Number of portions, never below 1 in a valid line
    pub quantity: u32,

    /// Extra noodles requested
    #[serde(rename = "isAddNoodle")]
    pub add_noodle: bool,

    /// Free-text remarks for the kitchen
    #[serde(default)]
    pub remarks: String,
}

impl CartItem {
    /// Creates a single-portion line from a menu item.
    ///
    /// The add-on request is dropped when the menu item does not offer it.
    pub fn from_menu_item(item: &MenuItem, add_noodle: bool) -> Self {
        Self {
            item_id: item.id.clone(),
            name: item.name.clone(),
            base_price: item.price,
            quantity: 1,
            add_noodle: add_noodle && item.can_add_noodle,
            remarks: String::new(),
        }
    }

    /// Price of a single portion including the add-on surcharge.
    pub fn unit_price(&self) -> u64 {
        unit_price(self)
    }

    /// Price of the whole line.
    pub fn line_total(&self) -> u64 {
        line_total(self)
    }

    /// Whether this line shares its identity with `(item_id, add_noodle)`.
    pub fn matches(&self, item_id: &MenuItemId, add_noodle: bool) -> bool {
        self.item_id == *item_id && self.add_noodle == add_noodle
    }
}
