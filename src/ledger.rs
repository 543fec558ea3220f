//! Order Ledger
//!
//! Completed orders in the order they were placed. Entries are only ever
//! appended, amended through [`Ledger::edit_order`], or dropped all at once by
//! [`Ledger::clear`] when the day is closed out.

use std::fmt::{Display, Formatter, Result as FmtResult};

use jiff::{Timestamp, civil::Date, tz::TimeZone};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{items::CartItem, pricing::order_total};

/// Errors raised when writing to the ledger. The ledger is unchanged whenever
/// one is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// No order with this number.
    #[error("order {0} not found")]
    NotFound(OrderNumber),

    /// An order needs at least one line.
    #[error("order has no items")]
    EmptyOrder,

    /// A line has a quantity of zero (line index).
    #[error("line {0} has a quantity of zero")]
    InvalidQuantity(usize),
}

/// Human-facing order number, e.g. `007`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Minimum number of digits when rendering a sequence number.
    const WIDTH: usize = 3;

    /// Creates an order number from any string.
    pub fn new(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    /// Order number for the given position in the day's sequence.
    pub fn from_sequence(sequence: u64) -> Self {
        Self(format!("{sequence:0width$}", width = Self::WIDTH))
    }

    /// Position in the day's sequence, if this number was generated from one.
    pub fn sequence(&self) -> Option<u64> {
        self.0.parse().ok()
    }

    /// Returns the number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OrderNumber {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl Display for OrderNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// Dine-in or takeout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderType {
    /// Eaten at the restaurant
    #[default]
    DineIn,

    /// Packed to go
    Takeout,
}

impl OrderType {
    /// Label printed on receipts and exports.
    pub fn label(self) -> &'static str {
        match self {
            OrderType::DineIn => "內用",
            OrderType::Takeout => "外帶",
        }
    }
}

/// Snapshot of a cart at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedOrder {
    /// Human-facing number, unique within the ledger
    pub order_number: OrderNumber,

    /// Lines owned by this order alone
    pub items: Vec<CartItem>,

    /// Always equal to `order_total(&items)`
    pub total_amount: u64,

    /// Dine-in or takeout
    pub order_type: OrderType,

    /// When the order was placed; kept across edits
    pub timestamp: Timestamp,

    /// Customer or table descriptor, empty when not given
    #[serde(default)]
    pub customer: String,
}

impl CompletedOrder {
    /// Calendar date the order was placed on, in the given time zone.
    pub fn date_in(&self, tz: &TimeZone) -> Date {
        self.timestamp.to_zoned(tz.clone()).date()
    }
}

/// Details of an order being placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    /// Lines to snapshot
    pub items: Vec<CartItem>,

    /// Dine-in or takeout
    pub order_type: OrderType,

    /// Time of checkout
    pub timestamp: Timestamp,

    /// Customer or table descriptor
    pub customer: String,
}

impl NewOrder {
    /// Create an order from a snapshot of lines.
    pub fn new(items: Vec<CartItem>, order_type: OrderType, timestamp: Timestamp) -> Self {
        Self {
            items,
            order_type,
            timestamp,
            customer: String::new(),
        }
    }

    /// Set the customer or table descriptor.
    #[must_use]
    pub fn with_customer(mut self, customer: impl Into<String>) -> Self {
        self.customer = customer.into();
        self
    }
}

/// Completed orders in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    orders: Vec<CompletedOrder>,
}

impl Ledger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger from previously stored orders, kept in the given order.
    pub fn from_orders(orders: Vec<CompletedOrder>) -> Self {
        Self { orders }
    }

    /// Number the next order will receive: one past the highest sequence
    /// number in the ledger.
    pub fn next_order_number(&self) -> OrderNumber {
        let last = self
            .orders
            .iter()
            .filter_map(|order| order.order_number.sequence())
            .max()
            .unwrap_or(0);

        OrderNumber::from_sequence(last.saturating_add(1))
    }

    /// Record a new order and return a copy of it.
    ///
    /// The lines are moved into the order, so the caller's cart is never
    /// shared with it. Clearing the cart afterwards is up to the caller.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::EmptyOrder`]: no lines.
    /// - [`LedgerError::InvalidQuantity`]: a line has a quantity of zero.
    pub fn checkout(&mut self, order: NewOrder) -> Result<CompletedOrder, LedgerError> {
        if order.items.is_empty() {
            return Err(LedgerError::EmptyOrder);
        }

        validate_items(&order.items)?;

        let completed = CompletedOrder {
            order_number: self.next_order_number(),
            total_amount: order_total(&order.items),
            items: order.items,
            order_type: order.order_type,
            timestamp: order.timestamp,
            customer: order.customer,
        };

        self.orders.push(completed.clone());

        Ok(completed)
    }

    /// Replace the lines of an order and recompute its total.
    ///
    /// Number, type, customer and timestamp are kept.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotFound`]: no order with this number.
    /// - [`LedgerError::InvalidQuantity`]: a line has a quantity of zero.
    pub fn edit_order(
        &mut self,
        number: &OrderNumber,
        items: Vec<CartItem>,
    ) -> Result<&CompletedOrder, LedgerError> {
        validate_items(&items)?;

        let order = self
            .orders
            .iter_mut()
            .find(|order| order.order_number == *number)
            .ok_or_else(|| LedgerError::NotFound(number.clone()))?;

        order.total_amount = order_total(&items);
        order.items = items;

        Ok(&*order)
    }

    /// Find an order by number.
    pub fn get(&self, number: &OrderNumber) -> Option<&CompletedOrder> {
        self.orders
            .iter()
            .find(|order| order.order_number == *number)
    }

    /// Orders placed on `date` in the given time zone, oldest first.
    pub fn orders_on(&self, date: Date, tz: &TimeZone) -> Vec<&CompletedOrder> {
        self.orders
            .iter()
            .filter(|order| order.date_in(tz) == date)
            .collect()
    }

    /// Drop every order.
    pub fn clear(&mut self) {
        self.orders.clear();
    }

    /// Iterate over orders, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &CompletedOrder> {
        self.orders.iter()
    }

    /// All orders, oldest first.
    pub fn orders(&self) -> &[CompletedOrder] {
        &self.orders
    }

    /// Get the number of orders.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Check if the ledger is empty.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

fn validate_items(items: &[CartItem]) -> Result<(), LedgerError> {
    match items.iter().position(|line| line.quantity == 0) {
        Some(index) => Err(LedgerError::InvalidQuantity(index)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use jiff::{civil::date, tz::offset};
    use testresult::TestResult;

    use crate::{
        cart::Cart,
        menu::{Category, MenuItem, MenuItemId},
    };

    use super::*;

    fn menu_item(id: &str, name: &str, price: u64, can_add_noodle: bool) -> MenuItem {
        MenuItem {
            id: MenuItemId::from(id),
            name: name.to_string(),
            price,
            category: if can_add_noodle {
                Category::Noodles
            } else {
                Category::RicePorridge
            },
            can_add_noodle,
        }
    }

    fn taipei() -> TimeZone {
        TimeZone::fixed(offset(8))
    }

    fn at(timestamp: &str) -> Result<Timestamp, jiff::Error> {
        timestamp.parse()
    }

    fn filled_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add_item(&menu_item("n1", "蝦多多鍋燒麵", 200, true), true);
        cart.add_item(&menu_item("r9", "魯肉飯", 35, false), false);
        cart.add_item(&menu_item("r9", "魯肉飯", 35, false), false);
        cart
    }

    #[test]
    fn checkout_snapshots_lines_and_totals() -> TestResult {
        let mut ledger = Ledger::new();
        let cart = filled_cart();
        let timestamp = at("2026-10-16T04:30:00Z")?;

        let order = ledger.checkout(
            NewOrder::new(cart.items(), OrderType::Takeout, timestamp).with_customer("王先生"),
        )?;

        assert_eq!(order.order_number, OrderNumber::from("001"));
        assert_eq!(order.total_amount, 210 + 70);
        assert_eq!(order.order_type, OrderType::Takeout);
        assert_eq!(order.timestamp, timestamp);
        assert_eq!(order.customer, "王先生");
        assert_eq!(order.items, cart.items());

        Ok(())
    }

    #[test]
    fn checked_out_order_is_independent_of_later_cart_changes() -> TestResult {
        let mut ledger = Ledger::new();
        let mut cart = filled_cart();

        ledger.checkout(NewOrder::new(
            cart.items(),
            OrderType::DineIn,
            at("2026-10-16T04:30:00Z")?,
        ))?;

        cart.clear();
        let key = cart.add_item(&menu_item("t5", "蛋花湯", 30, false), false);
        cart.update_quantity(key, 4)?;

        let stored = ledger.get(&OrderNumber::from("001")).ok_or("missing order")?;

        assert_eq!(stored.items.len(), 2);
        assert_eq!(stored.total_amount, 280);
        assert!(stored.items.iter().all(|line| line.item_id.as_str() != "t5"));

        Ok(())
    }

    #[test]
    fn order_numbers_increase_and_restart_after_clear() -> TestResult {
        let mut ledger = Ledger::new();
        let timestamp = at("2026-10-16T04:30:00Z")?;

        for expected in ["001", "002", "003"] {
            let order = ledger.checkout(NewOrder::new(
                filled_cart().items(),
                OrderType::DineIn,
                timestamp,
            ))?;

            assert_eq!(order.order_number.as_str(), expected);
        }

        ledger.clear();

        assert_eq!(ledger.next_order_number(), OrderNumber::from("001"));

        Ok(())
    }

    #[test]
    fn next_order_number_skips_legacy_and_widens() -> TestResult {
        let timestamp = at("2026-10-16T04:30:00Z")?;
        let order = |number: &str| CompletedOrder {
            order_number: OrderNumber::from(number),
            items: filled_cart().items(),
            total_amount: 280,
            order_type: OrderType::DineIn,
            timestamp,
            customer: String::new(),
        };

        let ledger = Ledger::from_orders(vec![order("A12"), order("999"), order("417")]);

        assert_eq!(ledger.next_order_number(), OrderNumber::from("1000"));

        Ok(())
    }

    #[test]
    fn checkout_rejects_empty_order() -> TestResult {
        let mut ledger = Ledger::new();

        let result = ledger.checkout(NewOrder::new(
            Vec::new(),
            OrderType::DineIn,
            at("2026-10-16T04:30:00Z")?,
        ));

        assert_eq!(result, Err(LedgerError::EmptyOrder));
        assert!(ledger.is_empty());

        Ok(())
    }

    #[test]
    fn checkout_rejects_zero_quantity() -> TestResult {
        let mut ledger = Ledger::new();
        let mut items = filled_cart().items();

        if let Some(line) = items.get_mut(1) {
            line.quantity = 0;
        }

        let result = ledger.checkout(NewOrder::new(
            items,
            OrderType::DineIn,
            at("2026-10-16T04:30:00Z")?,
        ));

        assert_eq!(result, Err(LedgerError::InvalidQuantity(1)));
        assert!(ledger.is_empty());

        Ok(())
    }

    #[test]
    fn edit_order_replaces_lines_and_keeps_identity() -> TestResult {
        let mut ledger = Ledger::new();
        let timestamp = at("2026-10-16T04:30:00Z")?;
        ledger.checkout(NewOrder::new(
            filled_cart().items(),
            OrderType::Takeout,
            timestamp,
        ))?;

        let number = OrderNumber::from("001");
        let mut draft = Cart::from_items(ledger.get(&number).ok_or("missing")?.items.clone());
        let key = draft.key_at(1).ok_or("missing line")?;
        draft.remove(key)?;
        draft.add_item(&menu_item("n6", "牛奶意麵", 100, true), false);

        let edited = ledger.edit_order(&number, draft.into_items())?;

        assert_eq!(edited.order_number, number);
        assert_eq!(edited.timestamp, timestamp);
        assert_eq!(edited.order_type, OrderType::Takeout);
        assert_eq!(edited.total_amount, 210 + 100);
        assert_eq!(edited.items.len(), 2);

        Ok(())
    }

    #[test]
    fn edit_order_can_leave_an_order_empty() -> TestResult {
        let mut ledger = Ledger::new();
        ledger.checkout(NewOrder::new(
            filled_cart().items(),
            OrderType::DineIn,
            at("2026-10-16T04:30:00Z")?,
        ))?;

        let edited = ledger.edit_order(&OrderNumber::from("001"), Vec::new())?;

        assert_eq!(edited.total_amount, 0);

        Ok(())
    }

    #[test]
    fn edit_unknown_order_is_not_found_and_changes_nothing() -> TestResult {
        let mut ledger = Ledger::new();
        ledger.checkout(NewOrder::new(
            filled_cart().items(),
            OrderType::DineIn,
            at("2026-10-16T04:30:00Z")?,
        ))?;
        let before = ledger.clone();

        let result = ledger.edit_order(&OrderNumber::from("404"), Vec::new());

        assert_eq!(result, Err(LedgerError::NotFound(OrderNumber::from("404"))));
        assert_eq!(ledger, before);

        Ok(())
    }

    #[test]
    fn orders_on_filters_by_local_date() -> TestResult {
        let mut ledger = Ledger::new();

        for timestamp in [
            "2026-10-15T15:59:00Z",
            "2026-10-15T16:00:00Z",
            "2026-10-16T15:30:00Z",
            "2026-10-16T16:30:00Z",
        ] {
            ledger.checkout(NewOrder::new(
                filled_cart().items(),
                OrderType::DineIn,
                at(timestamp)?,
            ))?;
        }

        let numbers: Vec<&str> = ledger
            .orders_on(date(2026, 10, 16), &taipei())
            .iter()
            .map(|order| order.order_number.as_str())
            .collect();

        assert_eq!(numbers, ["002", "003"]);

        Ok(())
    }

    #[test]
    fn completed_order_uses_stored_field_names() -> TestResult {
        let mut ledger = Ledger::new();
        ledger.checkout(NewOrder::new(
            filled_cart().items(),
            OrderType::DineIn,
            at("2026-10-16T04:30:00Z")?,
        ))?;

        let json = serde_json::to_value(ledger.orders())?;

        assert_eq!(json[0]["orderNumber"], "001");
        assert_eq!(json[0]["orderType"], "dine-in");
        assert_eq!(json[0]["totalAmount"], 280);
        assert_eq!(json[0]["timestamp"], "2026-10-16T04:30:00Z");

        Ok(())
    }

    #[test]
    fn stored_order_without_customer_decodes() -> TestResult {
        let json = r#"{
            "orderNumber": "482",
            "items": [],
            "totalAmount": 0,
            "orderType": "takeout",
            "timestamp": "2026-10-16T04:30:00.123Z"
        }"#;

        let order: CompletedOrder = serde_json::from_str(json)?;

        assert_eq!(order.order_type, OrderType::Takeout);
        assert!(order.customer.is_empty());
        assert_eq!(order.order_number.sequence(), Some(482));

        Ok(())
    }
}
