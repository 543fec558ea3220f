//! Persistence
//!
//! Maps the cart, the ledger and the menu onto a [`KeyValueStore`]. Each
//! collection is rewritten in full on every save. Unreadable stored values
//! are logged and replaced by defaults so the shop can keep taking orders.

use nabeyaki::{
    cart::Cart,
    fixtures::FixtureError,
    items::CartItem,
    ledger::{CompletedOrder, Ledger},
    menu::{Catalog, MenuItem},
};
use rustc_hash::FxHashSet;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, warn};

use crate::store::{KeyValueStore, StoreError};

/// Key of the working cart
pub const CART_KEY: &str = "cart";

/// Key of the completed orders
pub const ORDERS_KEY: &str = "orders";

/// Key of the edited menu
pub const MENU_KEY: &str = "menu";

/// Errors raised while saving state.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The store rejected a read or write.
    #[error("failed to access {key}")]
    Store {
        /// Collection key
        key: &'static str,

        /// Underlying store error
        #[source]
        source: StoreError,
    },

    /// A collection could not be encoded.
    #[error("failed to encode {key}")]
    Encode {
        /// Collection key
        key: &'static str,

        /// Underlying encoder error
        #[source]
        source: serde_json::Error,
    },

    /// The built-in menu could not be loaded.
    #[error("failed to load the built-in menu")]
    Fixture(#[from] FixtureError),
}

fn load<T, S>(store: &S, key: &'static str) -> Option<T>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(error) => {
            warn!(key, %error, "failed to read stored value, using default");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(error) => {
            warn!(key, %error, "discarding unreadable stored value, using default");
            None
        }
    }
}

fn save<T, S>(store: &mut S, key: &'static str, value: &T) -> Result<(), PersistenceError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let raw =
        serde_json::to_string(value).map_err(|source| PersistenceError::Encode { key, source })?;

    store
        .set(key, &raw)
        .map_err(|source| PersistenceError::Store { key, source })?;

    debug!(key, bytes = raw.len(), "saved");

    Ok(())
}

/// Load the working cart, or an empty one.
pub fn load_cart<S: KeyValueStore + ?Sized>(store: &S) -> Cart {
    load::<Vec<CartItem>, _>(store, CART_KEY)
        .map(Cart::from_items)
        .unwrap_or_default()
}

/// Load the completed orders, or an empty ledger.
///
/// Duplicate order numbers are kept as stored and logged. Lookups by number
/// reach the earliest of them.
pub fn load_orders<S: KeyValueStore + ?Sized>(store: &S) -> Ledger {
    let orders = load::<Vec<CompletedOrder>, _>(store, ORDERS_KEY).unwrap_or_default();
    let mut seen = FxHashSet::default();

    for order in &orders {
        if !seen.insert(&order.order_number) {
            warn!(
                key = ORDERS_KEY,
                order_number = %order.order_number,
                "duplicate stored order number"
            );
        }
    }

    Ledger::from_orders(orders)
}

/// Load the edited menu, or the built-in one.
///
/// # Errors
///
/// Returns an error only if the built-in menu is needed and cannot be parsed.
pub fn load_menu<S: KeyValueStore + ?Sized>(store: &S) -> Result<Catalog, PersistenceError> {
    let stored = load::<Vec<MenuItem>, _>(store, MENU_KEY).and_then(|items| {
        Catalog::from_items(items)
            .inspect_err(|error| {
                warn!(key = MENU_KEY, %error, "discarding invalid stored menu, using default");
            })
            .ok()
    });

    match stored {
        Some(catalog) => Ok(catalog),
        None => Ok(Catalog::builtin()?),
    }
}

/// Save the working cart.
///
/// # Errors
///
/// Returns an error if the cart cannot be written.
pub fn save_cart<S: KeyValueStore + ?Sized>(
    store: &mut S,
    cart: &Cart,
) -> Result<(), PersistenceError> {
    let items: Vec<&CartItem> = cart.iter().collect();

    save(store, CART_KEY, &items)
}

/// Save the completed orders.
///
/// # Errors
///
/// Returns an error if the orders cannot be written.
pub fn save_orders<S: KeyValueStore + ?Sized>(
    store: &mut S,
    ledger: &Ledger,
) -> Result<(), PersistenceError> {
    save(store, ORDERS_KEY, ledger.orders())
}

/// Save the menu.
///
/// # Errors
///
/// Returns an error if the menu cannot be written.
pub fn save_menu<S: KeyValueStore + ?Sized>(
    store: &mut S,
    catalog: &Catalog,
) -> Result<(), PersistenceError> {
    save(store, MENU_KEY, catalog.items())
}

/// Drop the stored orders.
///
/// # Errors
///
/// Returns an error if the orders cannot be removed.
pub fn clear_orders<S: KeyValueStore + ?Sized>(store: &mut S) -> Result<(), PersistenceError> {
    store
        .remove(ORDERS_KEY)
        .map_err(|source| PersistenceError::Store {
            key: ORDERS_KEY,
            source,
        })?;

    debug!(key = ORDERS_KEY, "removed");

    Ok(())
}
