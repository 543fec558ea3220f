//! Cart

use slotmap::{SlotMap, new_key_type};
use thiserror::Error;

use crate::{
    items::CartItem,
    menu::MenuItem,
    pricing::{item_count, order_total},
};

new_key_type! {
    /// Stable handle to a cart entry, valid until that entry is removed.
    pub struct CartEntryKey;
}

/// Errors related to cart edits.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// The entry was removed, or never belonged to this cart.
    #[error("cart entry not found")]
    EntryNotFound(CartEntryKey),
}

/// Working set of line items before checkout.
///
/// Entries keep the order in which they were first added. Lines are unique
/// per `(item_id, add_noodle)` pair.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    entries: SlotMap<CartEntryKey, CartItem>,
    order: Vec<CartEntryKey>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cart holding the given lines, in order.
    ///
    /// Lines are taken as-is; duplicates are not merged.
    pub fn from_items(items: impl IntoIterator<Item = CartItem>) -> Self {
        let mut cart = Self::new();

        for item in items {
            let key = cart.entries.insert(item);
            cart.order.push(key);
        }

        cart
    }

    /// Add one portion of a menu item.
    ///
    /// Increments the matching line when one exists, otherwise appends a new
    /// line. An add-on request for an item that does not offer it is dropped.
    pub fn add_item(&mut self, menu_item: &MenuItem, add_noodle: bool) -> CartEntryKey {
        let add_noodle = add_noodle && menu_item.can_add_noodle;

        let existing = self.order.iter().copied().find(|key| {
            self.entries
                .get(*key)
                .is_some_and(|line| line.matches(&menu_item.id, add_noodle))
        });

        if let Some(key) = existing
            && let Some(line) = self.entries.get_mut(key)
        {
            line.quantity = line.quantity.saturating_add(1);
            return key;
        }

        let key = self
            .entries
            .insert(CartItem::from_menu_item(menu_item, add_noodle));

        self.order.push(key);

        key
    }

    /// Change the quantity of an entry by `delta`.
    ///
    /// A change that would leave fewer than one portion is ignored; removal is
    /// explicit. Returns the resulting quantity.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::EntryNotFound`] for a stale key.
    pub fn update_quantity(&mut self, key: CartEntryKey, delta: i64) -> Result<u32, CartError> {
        let line = self
            .entries
            .get_mut(key)
            .ok_or(CartError::EntryNotFound(key))?;

        let quantity = i64::from(line.quantity).saturating_add(delta);

        if quantity >= 1
            && let Ok(quantity) = u32::try_from(quantity)
        {
            line.quantity = quantity;
        }

        Ok(line.quantity)
    }

    /// Replace the remarks of an entry verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::EntryNotFound`] for a stale key.
    pub fn update_remarks(
        &mut self,
        key: CartEntryKey,
        remarks: impl Into<String>,
    ) -> Result<(), CartError> {
        let line = self
            .entries
            .get_mut(key)
            .ok_or(CartError::EntryNotFound(key))?;

        line.remarks = remarks.into();

        Ok(())
    }

    /// Remove an entry. Keys of the other entries stay valid.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::EntryNotFound`] for a stale key.
    pub fn remove(&mut self, key: CartEntryKey) -> Result<CartItem, CartError> {
        let line = self
            .entries
            .remove(key)
            .ok_or(CartError::EntryNotFound(key))?;

        self.order.retain(|existing| *existing != key);

        Ok(line)
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Get an entry.
    pub fn get(&self, key: CartEntryKey) -> Option<&CartItem> {
        self.entries.get(key)
    }

    /// Key of the entry shown at `position` (0-based).
    pub fn key_at(&self, position: usize) -> Option<CartEntryKey> {
        self.order.get(position).copied()
    }

    /// Iterate over entries in display order.
    pub fn entries(&self) -> impl Iterator<Item = (CartEntryKey, &CartItem)> {
        self.order
            .iter()
            .filter_map(|key| self.entries.get(*key).map(|line| (*key, line)))
    }

    /// Iterate over the lines in display order.
    pub fn iter(&self) -> impl Iterator<Item = &CartItem> {
        self.entries().map(|(_, line)| line)
    }

    /// Deep copy of the lines in display order.
    pub fn items(&self) -> Vec<CartItem> {
        self.iter().cloned().collect()
    }

    /// Consume the cart, returning its lines in display order.
    pub fn into_items(mut self) -> Vec<CartItem> {
        self.order
            .iter()
            .filter_map(|key| self.entries.remove(*key))
            .collect()
    }

    /// Calculate the subtotal of the cart.
    pub fn subtotal(&self) -> u64 {
        order_total(self.iter())
    }

    /// Number of portions in the cart.
    pub fn item_count(&self) -> u64 {
        item_count(self.iter())
    }

    /// Get the number of lines in the cart.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::menu::{Category, MenuItemId};

    use super::*;

    fn noodles() -> MenuItem {
        MenuItem {
            id: MenuItemId::from("n10"),
            name: "鍋燒意麵".to_string(),
            price: 90,
            category: Category::Noodles,
            can_add_noodle: true,
        }
    }

    fn soup() -> MenuItem {
        MenuItem {
            id: MenuItemId::from("t3"),
            name: "蛤蜊湯".to_string(),
            price: 50,
            category: Category::Soups,
            can_add_noodle: false,
        }
    }

    #[test]
    fn adding_same_item_and_add_on_twice_increments_quantity() {
        let mut cart = Cart::new();

        let first = cart.add_item(&noodles(), false);
        let second = cart.add_item(&noodles(), false);

        assert_eq!(first, second);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(first).map(|line| line.quantity), Some(2));
    }

    #[test]
    fn adding_same_item_with_different_add_on_creates_two_lines() {
        let mut cart = Cart::new();

        let plain = cart.add_item(&noodles(), false);
        let extra = cart.add_item(&noodles(), true);

        assert_ne!(plain, extra);
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.subtotal(), 90 + 100);
    }

    #[test]
    fn add_on_request_on_unsupported_item_merges_with_plain_line() {
        let mut cart = Cart::new();

        let plain = cart.add_item(&soup(), false);
        let requested = cart.add_item(&soup(), true);

        assert_eq!(plain, requested);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(plain).map(|line| line.add_noodle), Some(false));
        assert_eq!(cart.get(plain).map(|line| line.quantity), Some(2));
    }

    #[test]
    fn update_quantity_applies_delta() -> TestResult {
        let mut cart = Cart::new();
        let key = cart.add_item(&noodles(), false);

        assert_eq!(cart.update_quantity(key, 3)?, 4);
        assert_eq!(cart.update_quantity(key, -2)?, 2);

        Ok(())
    }

    #[test]
    fn update_quantity_never_drops_below_one() -> TestResult {
        let mut cart = Cart::new();
        let key = cart.add_item(&noodles(), false);

        assert_eq!(cart.update_quantity(key, -1)?, 1);
        assert_eq!(cart.update_quantity(key, -50)?, 1);
        assert_eq!(cart.len(), 1);

        Ok(())
    }

    #[test]
    fn update_remarks_replaces_text_verbatim() -> TestResult {
        let mut cart = Cart::new();
        let key = cart.add_item(&noodles(), false);

        cart.update_remarks(key, "不要蔥")?;
        cart.update_remarks(key, "  少辣  ")?;

        assert_eq!(cart.get(key).map(|line| line.remarks.as_str()), Some("  少辣  "));

        Ok(())
    }

    #[test]
    fn remove_keeps_other_keys_valid() -> TestResult {
        let mut cart = Cart::new();
        let first = cart.add_item(&noodles(), false);
        let second = cart.add_item(&noodles(), true);
        let third = cart.add_item(&soup(), false);

        let removed = cart.remove(first)?;

        assert_eq!(removed.item_id, MenuItemId::from("n10"));
        assert_eq!(cart.key_at(0), Some(second));
        assert_eq!(cart.key_at(1), Some(third));
        assert_eq!(cart.update_quantity(third, 1)?, 2);

        Ok(())
    }

    #[test]
    fn stale_key_is_reported_and_cart_untouched() -> TestResult {
        let mut cart = Cart::new();
        let stale = cart.add_item(&noodles(), false);
        cart.remove(stale)?;
        let live = cart.add_item(&soup(), false);

        assert_eq!(
            cart.update_quantity(stale, 1),
            Err(CartError::EntryNotFound(stale))
        );
        assert_eq!(
            cart.update_remarks(stale, "x"),
            Err(CartError::EntryNotFound(stale))
        );
        assert!(cart.remove(stale).is_err());
        assert_eq!(cart.get(live).map(|line| line.quantity), Some(1));
        assert_eq!(cart.len(), 1);

        Ok(())
    }

    #[test]
    fn subtotal_matches_order_total() {
        let mut cart = Cart::new();
        cart.add_item(&noodles(), true);
        cart.add_item(&noodles(), true);
        cart.add_item(&soup(), false);

        assert_eq!(cart.subtotal(), order_total(&cart.items()));
        assert_eq!(cart.subtotal(), 250);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn items_is_a_deep_copy() {
        let mut cart = Cart::new();
        let key = cart.add_item(&noodles(), false);
        let snapshot = cart.items();

        cart.clear();
        cart.add_item(&soup(), false);

        assert!(cart.get(key).is_none());
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.first().map(|line| line.name.as_str()), Some("鍋燒意麵"));
    }

    #[test]
    fn from_items_and_into_items_preserve_order() {
        let lines = vec![
            CartItem::from_menu_item(&soup(), false),
            CartItem::from_menu_item(&noodles(), true),
        ];

        let cart = Cart::from_items(lines.clone());

        assert_eq!(cart.into_items(), lines);
    }

    #[test]
    fn empty_cart() {
        let cart = Cart::new();

        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), 0);
        assert_eq!(cart.key_at(0), None);
    }
}
