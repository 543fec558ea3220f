//! Nabeyaki prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartEntryKey, CartError},
    export::{ExportRow, HEADERS, export_rows, write_table},
    fixtures::FixtureError,
    items::CartItem,
    ledger::{CompletedOrder, Ledger, LedgerError, NewOrder, OrderNumber, OrderType},
    menu::{Catalog, CatalogError, Category, MenuItem, MenuItemId, MenuItemUpdate, parse_price},
    pricing::{ADD_NOODLE_SURCHARGE, item_count, line_total, order_total, unit_price},
    receipt::{Receipt, format_amount},
    reports::{DailyReport, ItemSales, ReportError, SalesSummary, item_ranking, summary},
};
