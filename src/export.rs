//! Order Export
//!
//! Flattens orders into one row per line item for spreadsheets and external
//! reporting.

use std::io;

use jiff::tz::TimeZone;
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use crate::{ledger::CompletedOrder, reports::ReportError};

/// Column headers, in column order.
pub const HEADERS: [&str; 11] = [
    "訂單編號",
    "時間",
    "類型",
    "顧客/桌號",
    "品項",
    "加麵",
    "數量",
    "備註",
    "單價",
    "小計",
    "訂單總額",
];

/// One line item of one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    /// Order number
    #[serde(rename = "訂單編號")]
    pub order_number: String,

    /// Local time the order was placed, `YYYY-MM-DD HH:MM`
    #[serde(rename = "時間")]
    pub timestamp: String,

    /// Dine-in / takeout label
    #[serde(rename = "類型")]
    pub order_type: &'static str,

    /// Customer or table descriptor
    #[serde(rename = "顧客/桌號")]
    pub customer: String,

    /// Dish name
    #[serde(rename = "品項")]
    pub item_name: String,

    /// `是` with the noodle add-on, `否` without
    #[serde(rename = "加麵")]
    pub add_noodle: &'static str,

    /// Portions
    #[serde(rename = "數量")]
    pub quantity: u32,

    /// Kitchen remarks
    #[serde(rename = "備註")]
    pub remarks: String,

    /// Price per portion, add-on included
    #[serde(rename = "單價")]
    pub unit_price: u64,

    /// Price of the line
    #[serde(rename = "小計")]
    pub line_total: u64,

    /// Total of the whole order, repeated on each of its rows
    #[serde(rename = "訂單總額")]
    pub order_total: u64,
}

impl ExportRow {
    fn cells(&self) -> [String; 11] {
        [
            self.order_number.clone(),
            self.timestamp.clone(),
            self.order_type.to_string(),
            self.customer.clone(),
            self.item_name.clone(),
            self.add_noodle.to_string(),
            self.quantity.to_string(),
            self.remarks.clone(),
            self.unit_price.to_string(),
            self.line_total.to_string(),
            self.order_total.to_string(),
        ]
    }
}

/// Build export rows for the given orders, in the order given.
///
/// Orders without lines produce no rows.
pub fn export_rows<'a>(
    orders: impl IntoIterator<Item = &'a CompletedOrder>,
    tz: &TimeZone,
) -> Vec<ExportRow> {
    orders
        .into_iter()
        .flat_map(|order| {
            let timestamp = order
                .timestamp
                .to_zoned(tz.clone())
                .strftime("%Y-%m-%d %H:%M")
                .to_string();

            order.items.iter().map(move |line| ExportRow {
                order_number: order.order_number.to_string(),
                timestamp: timestamp.clone(),
                order_type: order.order_type.label(),
                customer: order.customer.clone(),
                item_name: line.name.clone(),
                add_noodle: if line.add_noodle { "是" } else { "否" },
                quantity: line.quantity,
                remarks: line.remarks.clone(),
                unit_price: line.unit_price(),
                line_total: line.line_total(),
                order_total: order.total_amount,
            })
        })
        .collect()
}

/// Render export rows as a table.
///
/// # Errors
///
/// Returns an error if the table cannot be written.
pub fn write_table(mut out: impl io::Write, rows: &[ExportRow]) -> Result<(), ReportError> {
    let mut builder = Builder::default();

    builder.push_record(HEADERS);

    for row in rows {
        builder.push_record(row.cells());
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Columns::new(6..7), Alignment::right());
    table.modify(Columns::new(8..11), Alignment::right());

    writeln!(out, "{table}").map_err(ReportError::IO)
}
