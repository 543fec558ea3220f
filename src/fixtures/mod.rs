//! Fixtures
//!
//! The built-in menu ships as YAML inside the library and seeds the catalog
//! until an edited menu has been saved.

use serde::Deserialize;
use thiserror::Error;

use crate::menu::{Catalog, CatalogError, Category, MenuItem, MenuItemId};

/// Built-in menu, in menu order.
const DEFAULT_MENU: &str = include_str!("../../fixtures/menu/default.yml");

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// The fixture describes an invalid catalog
    #[error("Invalid menu fixture: {0}")]
    Catalog(#[from] CatalogError),
}

/// Wrapper for menu items in YAML
#[derive(Debug, Deserialize)]
pub struct MenuFixture {
    /// Menu items in menu order
    pub menu: Vec<MenuItemFixture>,
}

/// Menu Item Fixture
#[derive(Debug, Deserialize)]
pub struct MenuItemFixture {
    /// Item id
    pub id: String,

    /// Display name
    pub name: String,

    /// Price in whole currency units
    pub price: u64,

    /// Section heading, e.g. `麵類`
    pub category: Category,

    /// Whether the extra-noodle add-on is offered
    #[serde(default)]
    pub noodle: bool,
}

impl From<MenuItemFixture> for MenuItem {
    fn from(fixture: MenuItemFixture) -> Self {
        MenuItem {
            id: MenuItemId::new(fixture.id),
            name: fixture.name,
            price: fixture.price,
            category: fixture.category,
            can_add_noodle: fixture.noodle,
        }
    }
}

/// Parse a menu fixture from YAML.
///
/// # Errors
///
/// Returns an error if the YAML cannot be parsed or lists an id twice.
pub fn parse_menu(yaml: &str) -> Result<Catalog, FixtureError> {
    let fixture: MenuFixture = serde_norway::from_str(yaml)?;

    Ok(Catalog::from_items(
        fixture.menu.into_iter().map(MenuItem::from),
    )?)
}

impl Catalog {
    /// The built-in menu.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded fixture is invalid.
    pub fn builtin() -> Result<Self, FixtureError> {
        parse_menu(DEFAULT_MENU)
    }
}
