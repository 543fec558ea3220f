//! Sales Reports
//!
//! Read-only projections over a set of completed orders, usually one day's
//! worth from [`Ledger::orders_on`](crate::ledger::Ledger::orders_on).

use std::io;

use jiff::{civil::Date, tz::TimeZone};
use rustc_hash::FxHashMap;
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{ledger::CompletedOrder, pricing::line_total};

/// Errors that can occur when rendering a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// IO error
    #[error("IO error")]
    IO(#[source] io::Error),
}

/// Headline figures for a set of orders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    /// Sum of order totals
    pub total_revenue: u64,

    /// Number of orders
    pub order_count: u64,

    /// Revenue per order, rounded half up; zero without orders
    pub average_order_value: u64,
}

/// Sales of one dish, grouped by display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemSales {
    /// Display name of the dish
    pub name: String,

    /// Portions sold
    pub count: u64,

    /// Revenue from those portions, add-ons included
    pub revenue: u64,
}

/// Summarise revenue and order count.
pub fn summary<'a>(orders: impl IntoIterator<Item = &'a CompletedOrder>) -> SalesSummary {
    let (total_revenue, order_count) = orders
        .into_iter()
        .fold((0_u64, 0_u64), |(revenue, count), order| {
            (
                revenue.saturating_add(order.total_amount),
                count.saturating_add(1),
            )
        });

    SalesSummary {
        total_revenue,
        order_count,
        average_order_value: rounded_average(total_revenue, order_count),
    }
}

/// Rank dishes by portions sold, most popular first.
///
/// Lines are grouped by name, so two menu items sharing a name are counted
/// together. Ties keep the order in which the dishes were first seen.
pub fn item_ranking<'a>(orders: impl IntoIterator<Item = &'a CompletedOrder>) -> Vec<ItemSales> {
    let mut positions: FxHashMap<&str, usize> = FxHashMap::default();
    let mut ranking: Vec<ItemSales> = Vec::new();

    for line in orders.into_iter().flat_map(|order| order.items.iter()) {
        let position = *positions.entry(line.name.as_str()).or_insert_with(|| {
            ranking.push(ItemSales {
                name: line.name.clone(),
                count: 0,
                revenue: 0,
            });

            ranking.len() - 1
        });

        if let Some(sales) = ranking.get_mut(position) {
            sales.count = sales.count.saturating_add(u64::from(line.quantity));
            sales.revenue = sales.revenue.saturating_add(line_total(line));
        }
    }

    ranking.sort_by(|a, b| b.count.cmp(&a.count));

    ranking
}

fn rounded_average(total: u64, count: u64) -> u64 {
    if count == 0 {
        return 0;
    }

    let total = u128::from(total);
    let count = u128::from(count);

    u64::try_from((total * 2 + count) / (count * 2)).unwrap_or(u64::MAX)
}

/// One day's dashboard: headline figures, dish ranking and the order log.
#[derive(Debug, Clone)]
pub struct DailyReport<'a> {
    date: Date,
    summary: SalesSummary,
    ranking: Vec<ItemSales>,
    orders: Vec<&'a CompletedOrder>,
}

impl<'a> DailyReport<'a> {
    /// Build the report for the orders of one day.
    pub fn build(date: Date, orders: Vec<&'a CompletedOrder>) -> Self {
        Self {
            date,
            summary: summary(orders.iter().copied()),
            ranking: item_ranking(orders.iter().copied()),
            orders,
        }
    }

    /// Day covered by the report
    pub fn date(&self) -> Date {
        self.date
    }

    /// Headline figures
    pub fn summary(&self) -> SalesSummary {
        self.summary
    }

    /// Dishes by popularity
    pub fn ranking(&self) -> &[ItemSales] {
        &self.ranking
    }

    /// Orders of the day, oldest first
    pub fn orders(&self) -> &[&'a CompletedOrder] {
        &self.orders
    }

    /// Render the report as tables.
    ///
    /// # Errors
    ///
    /// Returns an error if the report cannot be written.
    pub fn write_to(&self, mut out: impl io::Write, tz: &TimeZone) -> Result<(), ReportError> {
        writeln!(out, "營運報表 {}", self.date).map_err(ReportError::IO)?;

        let mut summary = Builder::default();
        summary.push_record(["營業額", "訂單數", "平均客單價"]);
        summary.push_record([
            self.summary.total_revenue.to_string(),
            self.summary.order_count.to_string(),
            self.summary.average_order_value.to_string(),
        ]);

        let mut summary = summary.build();
        summary.with(Style::modern_rounded());
        summary.modify(Rows::first(), Alignment::center());

        writeln!(out, "{summary}").map_err(ReportError::IO)?;

        writeln!(out, "餐點銷售排行").map_err(ReportError::IO)?;

        if self.ranking.is_empty() {
            writeln!(out, "尚無銷售資料").map_err(ReportError::IO)?;
        } else {
            let mut ranking = Builder::default();
            ranking.push_record(["#", "品項", "數量", "金額"]);

            for (position, sales) in self.ranking.iter().enumerate() {
                ranking.push_record([
                    (position + 1).to_string(),
                    sales.name.clone(),
                    sales.count.to_string(),
                    sales.revenue.to_string(),
                ]);
            }

            let mut ranking = ranking.build();
            ranking.with(Style::modern_rounded());
            ranking.modify(Columns::new(2..4), Alignment::right());

            writeln!(out, "{ranking}").map_err(ReportError::IO)?;
        }

        writeln!(out, "訂單紀錄").map_err(ReportError::IO)?;

        if self.orders.is_empty() {
            writeln!(out, "尚無訂單").map_err(ReportError::IO)?;
            return Ok(());
        }

        let mut log = Builder::default();
        log.push_record(["單號", "時間", "類型", "品項", "金額"]);

        for order in self.orders.iter().rev() {
            let lines: Vec<String> = order
                .items
                .iter()
                .map(|line| format!("{} x{}", line.name, line.quantity))
                .collect();

            log.push_record([
                order.order_number.to_string(),
                order
                    .timestamp
                    .to_zoned(tz.clone())
                    .strftime("%H:%M")
                    .to_string(),
                order.order_type.label().to_string(),
                lines.join("\n"),
                order.total_amount.to_string(),
            ]);
        }

        let mut log = log.build();
        log.with(Style::modern_rounded());
        log.modify(Columns::last(), Alignment::right());

        writeln!(out, "{log}").map_err(ReportError::IO)
    }
}
