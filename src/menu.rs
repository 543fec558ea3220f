//! Menu

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by catalog edits and admin input parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// A menu item with this id already exists.
    #[error("menu item {0} already exists")]
    DuplicateId(MenuItemId),

    /// No menu item with this id.
    #[error("menu item {0} not found")]
    NotFound(MenuItemId),

    /// Menu item names must not be blank.
    #[error("menu item name cannot be empty")]
    InvalidName,

    /// Price input was not a non-negative whole number.
    #[error("invalid price: {0:?}")]
    InvalidPrice(String),
}

/// Stable menu item identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuItemId(String);

impl MenuItemId {
    /// Creates an id from any string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MenuItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl Display for MenuItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// Menu section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Noodle dishes, the only ones offering the extra-noodle add-on
    #[serde(rename = "麵類")]
    Noodles,

    /// Rice and porridge
    #[serde(rename = "飯・粥類")]
    RicePorridge,

    /// Side dishes
    #[serde(rename = "小菜類")]
    Sides,

    /// Soups
    #[serde(rename = "湯類")]
    Soups,

    /// Anything else
    #[serde(rename = "其他")]
    Others,
}

impl Category {
    /// Order in which sections appear on the menu.
    pub const DISPLAY_ORDER: [Category; 5] = [
        Category::Noodles,
        Category::RicePorridge,
        Category::Sides,
        Category::Soups,
        Category::Others,
    ];

    /// Section heading.
    pub fn label(self) -> &'static str {
        match self {
            Category::Noodles => "麵類",
            Category::RicePorridge => "飯・粥類",
            Category::Sides => "小菜類",
            Category::Soups => "湯類",
            Category::Others => "其他",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.label())
    }
}

/// Purchasable menu item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Unique within the catalog
    pub id: MenuItemId,

    /// Display name
    pub name: String,

    /// Base price in whole currency units
    pub price: u64,

    /// Menu section
    pub category: Category,

    /// Whether the extra-noodle add-on is offered
    pub can_add_noodle: bool,
}

/// Admin edit of an existing menu item. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuItemUpdate {
    /// New display name
    pub name: Option<String>,

    /// New base price
    pub price: Option<u64>,
}

/// The editable set of menu items, in menu order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    items: Vec<MenuItem>,
}

impl Catalog {
    /// Create a catalog from the given items.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] if two items share an id.
    pub fn from_items(items: impl IntoIterator<Item = MenuItem>) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();

        for item in items {
            catalog.add(item)?;
        }

        Ok(catalog)
    }

    /// Look up a menu item by id.
    pub fn get(&self, id: &MenuItemId) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.id == *id)
    }

    /// Append a new item to the menu.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::DuplicateId`]: the id is already taken.
    /// - [`CatalogError::InvalidName`]: the name is blank.
    pub fn add(&mut self, mut item: MenuItem) -> Result<(), CatalogError> {
        if self.get(&item.id).is_some() {
            return Err(CatalogError::DuplicateId(item.id));
        }

        item.name = validate_name(&item.name)?;
        self.items.push(item);

        Ok(())
    }

    /// Edit the name and/or price of an item in place.
    ///
    /// Nothing changes unless the whole update is valid.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NotFound`]: no item with this id.
    /// - [`CatalogError::InvalidName`]: the new name is blank.
    pub fn update(
        &mut self,
        id: &MenuItemId,
        update: MenuItemUpdate,
    ) -> Result<&MenuItem, CatalogError> {
        let name = update.name.as_deref().map(validate_name).transpose()?;

        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == *id)
            .ok_or_else(|| CatalogError::NotFound(id.clone()))?;

        if let Some(name) = name {
            item.name = name;
        }

        if let Some(price) = update.price {
            item.price = price;
        }

        Ok(&*item)
    }

    /// Items whose name contains `term`. An empty term matches everything.
    pub fn search<'a>(&'a self, term: &'a str) -> impl Iterator<Item = &'a MenuItem> + 'a {
        let term = term.trim();

        self.items
            .iter()
            .filter(move |item| term.is_empty() || item.name.contains(term))
    }

    /// Items grouped by section in [`Category::DISPLAY_ORDER`], empty sections skipped.
    pub fn by_category(&self) -> Vec<(Category, Vec<&MenuItem>)> {
        Category::DISPLAY_ORDER
            .iter()
            .filter_map(|&category| {
                let items: Vec<&MenuItem> = self
                    .items
                    .iter()
                    .filter(|item| item.category == category)
                    .collect();

                (!items.is_empty()).then_some((category, items))
            })
            .collect()
    }

    /// Iterate over the items in menu order.
    pub fn iter(&self) -> impl Iterator<Item = &MenuItem> {
        self.items.iter()
    }

    /// All items in menu order.
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Get the number of items on the menu.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the menu is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Parse an admin-entered price.
///
/// # Errors
///
/// Returns [`CatalogError::InvalidPrice`] unless the input is a non-negative
/// whole number.
pub fn parse_price(input: &str) -> Result<u64, CatalogError> {
    input
        .trim()
        .parse::<u64>()
        .map_err(|_err| CatalogError::InvalidPrice(input.to_string()))
}

fn validate_name(name: &str) -> Result<String, CatalogError> {
    let name = name.trim();

    if name.is_empty() {
        return Err(CatalogError::InvalidName);
    }

    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn item(id: &str, name: &str, price: u64, category: Category) -> MenuItem {
        MenuItem {
            id: MenuItemId::from(id),
            name: name.to_string(),
            price,
            category,
            can_add_noodle: category == Category::Noodles,
        }
    }

    fn test_catalog() -> Result<Catalog, CatalogError> {
        Catalog::from_items([
            item("n6", "牛奶意麵", 100, Category::Noodles),
            item("t5", "蛋花湯", 30, Category::Soups),
            item("n10", "鍋燒意麵", 90, Category::Noodles),
            item("s10", "燙青菜", 30, Category::Sides),
        ])
    }

    #[test]
    fn from_items_rejects_duplicate_ids() {
        let result = Catalog::from_items([
            item("n1", "蝦多多鍋燒麵", 200, Category::Noodles),
            item("n1", "海鮮意麵", 140, Category::Noodles),
        ]);

        assert_eq!(
            result,
            Err(CatalogError::DuplicateId(MenuItemId::from("n1")))
        );
    }

    #[test]
    fn add_appends_and_trims_name() -> TestResult {
        let mut catalog = test_catalog()?;

        catalog.add(item("x1", "  滷蛋 ", 15, Category::Others))?;

        let added = catalog.get(&MenuItemId::from("x1")).ok_or("missing item")?;

        assert_eq!(added.name, "滷蛋");
        assert_eq!(catalog.len(), 5);
        assert_eq!(
            catalog.iter().last().map(|item| item.id.as_str()),
            Some("x1")
        );

        Ok(())
    }

    #[test]
    fn add_rejects_blank_name() -> TestResult {
        let mut catalog = test_catalog()?;

        let result = catalog.add(item("x1", "   ", 15, Category::Others));

        assert_eq!(result, Err(CatalogError::InvalidName));
        assert_eq!(catalog.len(), 4);

        Ok(())
    }

    #[test]
    fn update_changes_name_and_price_in_place() -> TestResult {
        let mut catalog = test_catalog()?;
        let id = MenuItemId::from("t5");

        catalog.update(
            &id,
            MenuItemUpdate {
                name: Some("蛋花湯(大)".to_string()),
                price: Some(40),
            },
        )?;

        let updated = catalog.get(&id).ok_or("missing item")?;

        assert_eq!(updated.name, "蛋花湯(大)");
        assert_eq!(updated.price, 40);
        assert_eq!(catalog.items().get(1), Some(updated));

        Ok(())
    }

    #[test]
    fn update_with_blank_name_keeps_previous_values() -> TestResult {
        let mut catalog = test_catalog()?;
        let id = MenuItemId::from("t5");

        let result = catalog.update(
            &id,
            MenuItemUpdate {
                name: Some(String::new()),
                price: Some(999),
            },
        );

        assert_eq!(result, Err(CatalogError::InvalidName));
        assert_eq!(catalog.get(&id).map(|item| item.price), Some(30));

        Ok(())
    }

    #[test]
    fn update_unknown_item_is_not_found() -> TestResult {
        let mut catalog = test_catalog()?;

        let result = catalog.update(&MenuItemId::from("zz"), MenuItemUpdate::default());

        assert_eq!(result, Err(CatalogError::NotFound(MenuItemId::from("zz"))));

        Ok(())
    }

    #[test]
    fn search_matches_substrings() -> TestResult {
        let catalog = test_catalog()?;

        let names: Vec<&str> = catalog.search("意麵").map(|i| i.name.as_str()).collect();

        assert_eq!(names, ["牛奶意麵", "鍋燒意麵"]);
        assert_eq!(catalog.search("").count(), 4);
        assert_eq!(catalog.search("披薩").count(), 0);

        Ok(())
    }

    #[test]
    fn by_category_follows_display_order_and_skips_empty_sections() -> TestResult {
        let catalog = test_catalog()?;

        let groups = catalog.by_category();
        let sections: Vec<Category> = groups.iter().map(|(category, _)| *category).collect();

        assert_eq!(
            sections,
            [Category::Noodles, Category::Sides, Category::Soups]
        );

        let noodles: Vec<&str> = groups
            .first()
            .map(|(_, items)| items.iter().map(|i| i.id.as_str()).collect())
            .unwrap_or_default();

        assert_eq!(noodles, ["n6", "n10"]);

        Ok(())
    }

    #[test]
    fn parse_price_accepts_whole_numbers() -> TestResult {
        assert_eq!(parse_price("120")?, 120);
        assert_eq!(parse_price(" 0 ")?, 0);

        Ok(())
    }

    #[test]
    fn parse_price_rejects_bad_input() {
        for input in ["", "abc", "-5", "12.5", "1e3"] {
            assert_eq!(
                parse_price(input),
                Err(CatalogError::InvalidPrice(input.to_string())),
                "input {input:?} should be rejected"
            );
        }
    }

    #[test]
    fn category_serializes_as_section_heading() -> TestResult {
        assert_eq!(serde_json::to_string(&Category::RicePorridge)?, "\"飯・粥類\"");
        assert_eq!(
            serde_json::from_str::<Category>("\"其他\"")?,
            Category::Others
        );

        Ok(())
    }
}
