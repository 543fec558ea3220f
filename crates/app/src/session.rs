//! Ordering session
//!
//! Owns the menu, the cart and the ledger for one shop, and writes every
//! change through to the store before returning.

use jiff::{Timestamp, civil::Date, tz::TimeZone};
use nabeyaki::{
    cart::{Cart, CartEntryKey, CartError},
    export::{ExportRow, export_rows},
    items::CartItem,
    ledger::{CompletedOrder, Ledger, LedgerError, NewOrder, OrderNumber, OrderType},
    menu::{Catalog, CatalogError, Category, MenuItem, MenuItemId, MenuItemUpdate},
    reports::DailyReport,
};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    persistence::{self, PersistenceError},
    store::KeyValueStore,
};

/// Errors raised by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Cart edit failed.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Ledger write failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Menu edit failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// State could not be saved or loaded.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// No menu item with this id.
    #[error("menu item {0} not found")]
    UnknownMenuItem(MenuItemId),
}

/// The shop's working state, backed by a store.
#[derive(Debug)]
pub struct Session<S> {
    store: S,
    catalog: Catalog,
    cart: Cart,
    ledger: Ledger,
    time_zone: TimeZone,
}

impl<S: KeyValueStore> Session<S> {
    /// Load the session from `store`. Business days are reckoned in
    /// `time_zone`.
    ///
    /// # Errors
    ///
    /// Returns an error if no usable menu can be loaded.
    pub fn open(store: S, time_zone: TimeZone) -> Result<Self, SessionError> {
        let catalog = persistence::load_menu(&store)?;
        let cart = persistence::load_cart(&store);
        let ledger = persistence::load_orders(&store);

        debug!(
            menu_items = catalog.len(),
            cart_lines = cart.len(),
            orders = ledger.len(),
            "session opened"
        );

        Ok(Self {
            store,
            catalog,
            cart,
            ledger,
            time_zone,
        })
    }

    /// The menu
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The working cart
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Completed orders
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Time zone of the business day
    pub fn time_zone(&self) -> &TimeZone {
        &self.time_zone
    }

    /// The backing store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Close the session, returning the store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Today's date in the session time zone.
    pub fn today(&self) -> Date {
        Timestamp::now().to_zoned(self.time_zone.clone()).date()
    }

    fn menu_item(&self, id: &MenuItemId) -> Result<&MenuItem, SessionError> {
        self.catalog
            .get(id)
            .ok_or_else(|| SessionError::UnknownMenuItem(id.clone()))
    }

    fn save_cart(&mut self) -> Result<(), SessionError> {
        Ok(persistence::save_cart(&mut self.store, &self.cart)?)
    }

    /// Add one portion of a menu item to the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the item is not on the menu or the cart cannot be
    /// saved.
    pub fn add_to_cart(
        &mut self,
        id: &MenuItemId,
        add_noodle: bool,
    ) -> Result<CartEntryKey, SessionError> {
        let item = self
            .catalog
            .get(id)
            .ok_or_else(|| SessionError::UnknownMenuItem(id.clone()))?;

        let key = self.cart.add_item(item, add_noodle);

        debug!(item = %id, add_noodle, "added to cart");

        self.save_cart()?;

        Ok(key)
    }

    /// Change the quantity of a cart entry by `delta`, returning the new
    /// quantity. Quantities never drop below one.
    ///
    /// # Errors
    ///
    /// Returns an error for a stale key or if the cart cannot be saved.
    pub fn update_quantity(&mut self, key: CartEntryKey, delta: i64) -> Result<u32, SessionError> {
        let quantity = self.cart.update_quantity(key, delta)?;

        debug!(delta, quantity, "cart quantity changed");

        self.save_cart()?;

        Ok(quantity)
    }

    /// Replace the remarks of a cart entry.
    ///
    /// # Errors
    ///
    /// Returns an error for a stale key or if the cart cannot be saved.
    pub fn update_remarks(
        &mut self,
        key: CartEntryKey,
        remarks: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.cart.update_remarks(key, remarks)?;

        debug!("cart remarks changed");

        self.save_cart()
    }

    /// Remove a cart entry.
    ///
    /// # Errors
    ///
    /// Returns an error for a stale key or if the cart cannot be saved.
    pub fn remove_from_cart(&mut self, key: CartEntryKey) -> Result<CartItem, SessionError> {
        let line = self.cart.remove(key)?;

        debug!(item = %line.item_id, "removed from cart");

        self.save_cart()?;

        Ok(line)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be saved.
    pub fn clear_cart(&mut self) -> Result<(), SessionError> {
        self.cart.clear();

        debug!("cart cleared");

        self.save_cart()
    }

    /// Place the cart as an order now.
    ///
    /// # Errors
    ///
    /// See [`Session::checkout_at`].
    pub fn checkout(
        &mut self,
        order_type: OrderType,
        customer: impl Into<String>,
    ) -> Result<CompletedOrder, SessionError> {
        self.checkout_at(order_type, customer, Timestamp::now())
    }

    /// Place the cart as an order at `timestamp`.
    ///
    /// The order keeps its own copy of the cart lines. The cart is emptied
    /// once the order has been saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart is empty or state cannot be saved.
    pub fn checkout_at(
        &mut self,
        order_type: OrderType,
        customer: impl Into<String>,
        timestamp: Timestamp,
    ) -> Result<CompletedOrder, SessionError> {
        let mut ledger = self.ledger.clone();
        let order = ledger.checkout(
            NewOrder::new(self.cart.items(), order_type, timestamp).with_customer(customer),
        )?;

        persistence::save_orders(&mut self.store, &ledger)?;
        self.ledger = ledger;

        self.cart.clear();
        self.save_cart()?;

        info!(
            order_number = %order.order_number,
            order_type = order.order_type.label(),
            total = order.total_amount,
            lines = order.items.len(),
            "order placed"
        );

        Ok(order)
    }

    /// Edit the lines of a completed order.
    ///
    /// `edit` works on a copy of the order's lines held in a [`Cart`]. The
    /// order is only replaced when `edit` succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist, `edit` fails, the edited
    /// lines are invalid, or the orders cannot be saved.
    pub fn edit_order<F, E>(&mut self, number: &OrderNumber, edit: F) -> Result<CompletedOrder, E>
    where
        F: FnOnce(&mut Cart, &Catalog) -> Result<(), E>,
        E: From<SessionError>,
    {
        let order = self
            .ledger
            .get(number)
            .ok_or_else(|| SessionError::Ledger(LedgerError::NotFound(number.clone())))?;

        let mut draft = Cart::from_items(order.items.clone());

        edit(&mut draft, &self.catalog)?;

        Ok(self.replace_order_items(number, draft.into_items())?)
    }

    /// Replace the lines of a completed order and recompute its total.
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist, a line has a quantity of
    /// zero, or the orders cannot be saved.
    pub fn replace_order_items(
        &mut self,
        number: &OrderNumber,
        items: Vec<CartItem>,
    ) -> Result<CompletedOrder, SessionError> {
        let mut ledger = self.ledger.clone();
        let order = ledger.edit_order(number, items)?.clone();

        persistence::save_orders(&mut self.store, &ledger)?;
        self.ledger = ledger;

        info!(
            order_number = %order.order_number,
            total = order.total_amount,
            lines = order.items.len(),
            "order edited"
        );

        Ok(order)
    }

    /// Close out the day, dropping every completed order. Returns how many
    /// orders were dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored orders cannot be removed.
    pub fn close_out_day(&mut self) -> Result<usize, SessionError> {
        let count = self.ledger.len();

        persistence::clear_orders(&mut self.store)?;
        self.ledger.clear();

        info!(orders = count, "day closed out");

        Ok(count)
    }

    /// Add a dish to the menu under a fresh id.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the menu cannot be saved.
    pub fn add_menu_item(
        &mut self,
        name: impl Into<String>,
        price: u64,
        category: Category,
        can_add_noodle: bool,
    ) -> Result<MenuItem, SessionError> {
        let id = MenuItemId::new(Uuid::now_v7().to_string());

        let mut catalog = self.catalog.clone();

        catalog.add(MenuItem {
            id: id.clone(),
            name: name.into(),
            price,
            category,
            can_add_noodle,
        })?;

        persistence::save_menu(&mut self.store, &catalog)?;
        self.catalog = catalog;

        let item = self.menu_item(&id)?.clone();

        info!(item = %item.id, name = %item.name, price, "menu item added");

        Ok(item)
    }

    /// Edit the name and/or price of a dish. Orders and cart lines keep the
    /// name and price they were created with.
    ///
    /// # Errors
    ///
    /// Returns an error if the item does not exist, the name is blank, or the
    /// menu cannot be saved.
    pub fn update_menu_item(
        &mut self,
        id: &MenuItemId,
        update: MenuItemUpdate,
    ) -> Result<MenuItem, SessionError> {
        let mut catalog = self.catalog.clone();
        let item = catalog.update(id, update)?.clone();

        persistence::save_menu(&mut self.store, &catalog)?;
        self.catalog = catalog;

        info!(item = %item.id, name = %item.name, price = item.price, "menu item updated");

        Ok(item)
    }

    /// Orders placed on `date`, oldest first.
    pub fn orders_on(&self, date: Date) -> Vec<&CompletedOrder> {
        self.ledger.orders_on(date, &self.time_zone)
    }

    /// Sales report for `date`.
    pub fn daily_report(&self, date: Date) -> DailyReport<'_> {
        DailyReport::build(date, self.orders_on(date))
    }

    /// Export rows for the orders of `date`, or for every order.
    pub fn export(&self, date: Option<Date>) -> Vec<ExportRow> {
        match date {
            Some(date) => export_rows(self.orders_on(date), &self.time_zone),
            None => export_rows(self.ledger.iter(), &self.time_zone),
        }
    }
}
