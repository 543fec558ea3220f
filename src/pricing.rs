//! Prices
//!
//! Every total in the system, whether for the live cart, a fresh order or an
//! edited one, is computed here.

use crate::items::CartItem;

/// Surcharge for extra noodles, per portion.
pub const ADD_NOODLE_SURCHARGE: u64 = 10;

/// Price of one portion of the line, including the add-on surcharge.
pub fn unit_price(item: &CartItem) -> u64 {
    if item.add_noodle {
        item.base_price.saturating_add(ADD_NOODLE_SURCHARGE)
    } else {
        item.base_price
    }
}

/// Price of the whole line: unit price times quantity.
pub fn line_total(item: &CartItem) -> u64 {
    unit_price(item).saturating_mul(u64::from(item.quantity))
}

/// Calculates the total price of a list of line items
pub fn order_total<'a>(items: impl IntoIterator<Item = &'a CartItem>) -> u64 {
    items
        .into_iter()
        .fold(0, |acc: u64, item| acc.saturating_add(line_total(item)))
}

/// Number of portions across all lines.
pub fn item_count<'a>(items: impl IntoIterator<Item = &'a CartItem>) -> u64 {
    items
        .into_iter()
        .fold(0, |acc: u64, item| acc.saturating_add(u64::from(item.quantity)))
}
