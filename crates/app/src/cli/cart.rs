use std::io::Write;

use clap::{Args, Subcommand};
use nabeyaki::{cart::Cart, menu::MenuItemId, receipt::format_amount};
use nabeyaki_app::{session::Session, store::KeyValueStore};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use super::{CliError, entry_at};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the cart
    Show,

    /// Add one portion of a dish
    Add(AddArgs),

    /// Change the quantity of a line by a positive or negative amount
    Quantity(QuantityArgs),

    /// Replace the kitchen remarks of a line
    Remarks(RemarksArgs),

    /// Remove a line
    Remove(RemoveArgs),

    /// Remove every line
    Clear,
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Menu item id
    id: String,

    /// With the extra-noodle add-on
    #[arg(long)]
    noodle: bool,
}

#[derive(Debug, Args)]
struct QuantityArgs {
    /// Line position, as shown by `cart show`
    position: usize,

    /// Change in portions, e.g. 2 or -1
    #[arg(allow_negative_numbers = true)]
    delta: i64,
}

#[derive(Debug, Args)]
struct RemarksArgs {
    /// Line position, as shown by `cart show`
    position: usize,

    /// Remarks for the kitchen; empty to clear
    #[arg(default_value = "")]
    text: String,
}

#[derive(Debug, Args)]
struct RemoveArgs {
    /// Line position, as shown by `cart show`
    position: usize,
}

pub(crate) fn run<S: KeyValueStore>(
    command: CartCommand,
    session: &mut Session<S>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match command.command {
        CartSubcommand::Show => {}
        CartSubcommand::Add(args) => {
            session.add_to_cart(&MenuItemId::new(args.id), args.noodle)?;
        }
        CartSubcommand::Quantity(args) => {
            let key = entry_at(session.cart(), args.position)?;
            session.update_quantity(key, args.delta)?;
        }
        CartSubcommand::Remarks(args) => {
            let key = entry_at(session.cart(), args.position)?;
            session.update_remarks(key, args.text)?;
        }
        CartSubcommand::Remove(args) => {
            let key = entry_at(session.cart(), args.position)?;
            session.remove_from_cart(key)?;
        }
        CartSubcommand::Clear => session.clear_cart()?,
    }

    write_cart(out, session.cart())
}

/// Print the lines of a cart with their positions.
pub(super) fn write_cart(out: &mut impl Write, cart: &Cart) -> Result<(), CliError> {
    if cart.is_empty() {
        writeln!(out, "購物車是空的")?;
        return Ok(());
    }

    let mut builder = Builder::default();
    builder.push_record(["#", "品項", "加麵", "數量", "備註", "小計"]);

    for (position, line) in cart.iter().enumerate() {
        builder.push_record([
            (position + 1).to_string(),
            line.name.clone(),
            if line.add_noodle { "+ 加麵" } else { "" }.to_string(),
            line.quantity.to_string(),
            line.remarks.clone(),
            format_amount(line.line_total()),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Columns::new(3..4), Alignment::right());
    table.modify(Columns::last(), Alignment::right());

    writeln!(out, "{table}")?;
    writeln!(
        out,
        "共 {} 份  合計 {}",
        cart.item_count(),
        format_amount(cart.subtotal())
    )?;

    Ok(())
}
