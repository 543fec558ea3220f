use std::io::Write;

use clap::{Args, Subcommand};
use jiff::civil::Date;
use nabeyaki::{
    cart::Cart,
    ledger::{CompletedOrder, LedgerError, OrderNumber},
    menu::{Catalog, MenuItemId},
    pricing::item_count,
    receipt::{Receipt, format_amount},
};
use nabeyaki_app::{
    session::{Session, SessionError},
    store::KeyValueStore,
};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use super::{CliError, entry_at};

#[derive(Debug, Args)]
pub(crate) struct OrdersCommand {
    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrdersSubcommand {
    /// List orders, newest first
    List(ListOrdersArgs),

    /// Show one order
    Show(ShowOrderArgs),

    /// Amend the lines of an order
    Edit(EditOrderArgs),
}

#[derive(Debug, Args)]
struct ListOrdersArgs {
    /// Business day, YYYY-MM-DD; today when omitted
    #[arg(long, conflicts_with = "all")]
    date: Option<Date>,

    /// Every order since the last close-out
    #[arg(long)]
    all: bool,
}

#[derive(Debug, Args)]
struct ShowOrderArgs {
    /// Order number, e.g. 001
    number: String,
}

#[derive(Debug, Args)]
struct EditOrderArgs {
    /// Order number, e.g. 001
    number: String,

    /// Add one portion of a dish
    #[arg(long, value_name = "ID")]
    add: Vec<String>,

    /// Add one portion of a dish with the extra-noodle add-on
    #[arg(long, value_name = "ID")]
    add_noodle: Vec<String>,

    /// Set the quantity of a line
    #[arg(long, value_name = "POSITION=QUANTITY", value_parser = parse_setting)]
    set: Vec<(usize, u32)>,

    /// Remove a line
    #[arg(long, value_name = "POSITION")]
    remove: Vec<usize>,
}

pub(crate) fn run<S: KeyValueStore>(
    command: OrdersCommand,
    session: &mut Session<S>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match command.command {
        OrdersSubcommand::List(args) => list(&args, session, out),
        OrdersSubcommand::Show(args) => show(args, session, out),
        OrdersSubcommand::Edit(args) => edit(args, session, out),
    }
}

fn list<S: KeyValueStore>(
    args: &ListOrdersArgs,
    session: &Session<S>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let orders: Vec<&CompletedOrder> = if args.all {
        session.ledger().iter().collect()
    } else {
        session.orders_on(args.date.unwrap_or_else(|| session.today()))
    };

    if orders.is_empty() {
        writeln!(out, "尚無訂單")?;
        return Ok(());
    }

    let mut builder = Builder::default();
    builder.push_record(["單號", "時間", "類型", "顧客/桌號", "份數", "金額"]);

    for order in orders.iter().rev() {
        builder.push_record([
            order.order_number.to_string(),
            order
                .timestamp
                .to_zoned(session.time_zone().clone())
                .strftime("%m/%d %H:%M")
                .to_string(),
            order.order_type.label().to_string(),
            order.customer.clone(),
            item_count(&order.items).to_string(),
            format_amount(order.total_amount),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Columns::new(4..6), Alignment::right());

    writeln!(out, "{table}")?;

    Ok(())
}

fn show<S: KeyValueStore>(
    args: ShowOrderArgs,
    session: &Session<S>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let number = OrderNumber::new(args.number);

    let order = session
        .ledger()
        .get(&number)
        .ok_or_else(|| SessionError::Ledger(LedgerError::NotFound(number.clone())))?;

    Receipt::new(order).write_to(out, session.time_zone())?;

    Ok(())
}

fn edit<S: KeyValueStore>(
    args: EditOrderArgs,
    session: &mut Session<S>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let number = OrderNumber::new(args.number);

    let order = session.edit_order(&number, |draft, catalog| -> Result<(), CliError> {
        // Positions refer to the lines as they were before this edit.
        let lines: &Cart = draft;

        let settings = args
            .set
            .iter()
            .map(|&(position, quantity)| Ok((entry_at(lines, position)?, quantity)))
            .collect::<Result<Vec<_>, CliError>>()?;

        let removals = args
            .remove
            .iter()
            .map(|&position| entry_at(lines, position))
            .collect::<Result<Vec<_>, CliError>>()?;

        for (key, quantity) in settings {
            let current = draft.get(key).map_or(0, |line| line.quantity);

            draft.update_quantity(key, i64::from(quantity) - i64::from(current))?;
        }

        for key in removals {
            draft.remove(key)?;
        }

        for id in &args.add {
            add_line(draft, catalog, id, false)?;
        }

        for id in &args.add_noodle {
            add_line(draft, catalog, id, true)?;
        }

        Ok(())
    })?;

    Receipt::new(&order).write_to(out, session.time_zone())?;

    Ok(())
}

fn add_line(
    draft: &mut Cart,
    catalog: &Catalog,
    id: &str,
    add_noodle: bool,
) -> Result<(), CliError> {
    let id = MenuItemId::from(id);
    let item = catalog
        .get(&id)
        .ok_or_else(|| SessionError::UnknownMenuItem(id.clone()))?;

    draft.add_item(item, add_noodle);

    Ok(())
}

fn parse_setting(input: &str) -> Result<(usize, u32), String> {
    let invalid = || {
        format!("expected POSITION=QUANTITY with a quantity of at least 1, got {input:?}")
    };

    let (position, quantity) = input.split_once('=').ok_or_else(invalid)?;
    let position = position.trim().parse().map_err(|_err| invalid())?;
    let quantity: u32 = quantity.trim().parse().map_err(|_err| invalid())?;

    if quantity == 0 {
        return Err(invalid());
    }

    Ok((position, quantity))
}
