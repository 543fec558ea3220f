//! Nabeyaki
//!
//! Nabeyaki is the ordering core of a small noodle shop: the menu, the cart,
//! add-on pricing, the ledger of completed orders and the sales reports built
//! from it.

pub mod cart;
pub mod export;
pub mod fixtures;
pub mod items;
pub mod ledger;
pub mod menu;
pub mod prelude;
pub mod pricing;
pub mod receipt;
pub mod reports;
