//! Receipt
//!
//! The confirmation a customer shows at the counter after checkout.

use std::io;

use jiff::tz::TimeZone;
use rusty_money::{Money, iso};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};

use crate::{ledger::CompletedOrder, reports::ReportError};

/// Printable confirmation for a completed order.
#[derive(Debug, Clone, Copy)]
pub struct Receipt<'a> {
    order: &'a CompletedOrder,
}

impl<'a> Receipt<'a> {
    /// Create a receipt for the given order.
    pub fn new(order: &'a CompletedOrder) -> Self {
        Self { order }
    }

    /// Prints the receipt.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt cannot be written.
    pub fn write_to(&self, mut out: impl io::Write, tz: &TimeZone) -> Result<(), ReportError> {
        let order = self.order;
        let placed_at = order
            .timestamp
            .to_zoned(tz.clone())
            .strftime("%m/%d %H:%M")
            .to_string();

        writeln!(out, "訂單編號 #{}", order.order_number).map_err(ReportError::IO)?;
        writeln!(out, "{}  {placed_at}", order.order_type.label()).map_err(ReportError::IO)?;

        if !order.customer.is_empty() {
            writeln!(out, "{}", order.customer).map_err(ReportError::IO)?;
        }

        let mut builder = Builder::default();
        builder.push_record(["品項", "數量", "金額"]);

        for line in &order.items {
            let mut description = line.name.clone();

            if line.add_noodle {
                description.push_str("\n+ 加麵");
            }

            if !line.remarks.is_empty() {
                description.push_str("\n備註: ");
                description.push_str(&line.remarks);
            }

            builder.push_record([
                description,
                format!("x{}", line.quantity),
                format_amount(line.line_total()),
            ]);
        }

        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.modify(Columns::new(1..3), Alignment::right());
        table.modify(Rows::first(), Alignment::center());

        writeln!(out, "{table}").map_err(ReportError::IO)?;
        writeln!(out, "總金額 {}", format_amount(order.total_amount)).map_err(ReportError::IO)?;
        writeln!(out, "請至櫃檯出示此畫面結帳").map_err(ReportError::IO)
    }
}

/// Format a whole-dollar amount in New Taiwan Dollars.
pub fn format_amount(amount: u64) -> String {
    i64::try_from(amount).map_or_else(
        |_| amount.to_string(),
        |major| Money::from_major(major, iso::TWD).to_string(),
    )
}

#[cfg(test)]
mod tests {
    use jiff::{Timestamp, tz::offset};
    use testresult::TestResult;

    use crate::{
        items::CartItem,
        ledger::{OrderNumber, OrderType},
        menu::MenuItemId,
        pricing::order_total,
    };

    use super::*;

    fn order() -> TestResult<CompletedOrder> {
        let items = vec![
            CartItem {
                item_id: MenuItemId::from("n1"),
                name: "蝦多多鍋燒麵".to_string(),
                base_price: 200,
                quantity: 1,
                add_noodle: true,
                remarks: "湯多".to_string(),
            },
            CartItem {
                item_id: MenuItemId::from("s11"),
                name: "荷包蛋".to_string(),
                base_price: 15,
                quantity: 2,
                add_noodle: false,
                remarks: String::new(),
            },
        ];

        Ok(CompletedOrder {
            order_number: OrderNumber::from("012"),
            total_amount: order_total(&items),
            items,
            order_type: OrderType::Takeout,
            timestamp: "2026-10-16T10:45:00Z".parse::<Timestamp>()?,
            customer: "陳小姐".to_string(),
        })
    }

    #[test]
    fn receipt_lists_lines_and_details() -> TestResult {
        let order = order()?;
        let mut out = Vec::new();

        Receipt::new(&order).write_to(&mut out, &TimeZone::fixed(offset(8)))?;

        let rendered = String::from_utf8(out)?;

        assert!(rendered.contains("#012"));
        assert!(rendered.contains("外帶"));
        assert!(rendered.contains("10/16 18:45"));
        assert!(rendered.contains("陳小姐"));
        assert!(rendered.contains("+ 加麵"));
        assert!(rendered.contains("備註: 湯多"));
        assert!(rendered.contains("x2"));
        assert!(rendered.contains(&format_amount(240)));

        Ok(())
    }

    #[test]
    fn format_amount_includes_the_amount() {
        assert!(format_amount(1_250).contains("1,250"));
    }
}
