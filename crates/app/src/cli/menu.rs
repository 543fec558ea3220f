use std::io::Write;

use clap::{Args, Subcommand};
use nabeyaki::{
    menu::{Category, MenuItem, MenuItemId, MenuItemUpdate, parse_price},
    receipt::format_amount,
};
use nabeyaki_app::{session::Session, store::KeyValueStore};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use super::CliError;

#[derive(Debug, Args)]
pub(crate) struct MenuCommand {
    #[command(subcommand)]
    command: MenuSubcommand,
}

#[derive(Debug, Subcommand)]
enum MenuSubcommand {
    /// Show the menu by section
    List(ListMenuArgs),

    /// Add a dish
    Add(AddMenuItemArgs),

    /// Rename or reprice a dish
    Update(UpdateMenuItemArgs),
}

#[derive(Debug, Args)]
struct ListMenuArgs {
    /// Only show dishes whose name contains this text
    #[arg(long)]
    search: Option<String>,
}

#[derive(Debug, Args)]
struct AddMenuItemArgs {
    /// Display name
    #[arg(long)]
    name: String,

    /// Price in whole dollars
    #[arg(long)]
    price: String,

    /// Section: noodles, rice, sides, soups, others (or the section heading)
    #[arg(long, value_parser = parse_category)]
    category: Category,

    /// Offer the extra-noodle add-on
    #[arg(long)]
    noodle: bool,
}

#[derive(Debug, Args)]
struct UpdateMenuItemArgs {
    /// Menu item id
    id: String,

    /// New display name
    #[arg(long)]
    name: Option<String>,

    /// New price in whole dollars
    #[arg(long)]
    price: Option<String>,
}

pub(crate) fn run<S: KeyValueStore>(
    command: MenuCommand,
    session: &mut Session<S>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match command.command {
        MenuSubcommand::List(args) => list(&args, session, out),
        MenuSubcommand::Add(args) => add(args, session, out),
        MenuSubcommand::Update(args) => update(args, session, out),
    }
}

fn list<S: KeyValueStore>(
    args: &ListMenuArgs,
    session: &Session<S>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let catalog = session.catalog();

    if let Some(term) = &args.search {
        let matches: Vec<&MenuItem> = catalog.search(term).collect();

        if matches.is_empty() {
            writeln!(out, "找不到符合「{term}」的餐點")?;
            return Ok(());
        }

        return write_items(out, &matches);
    }

    for (category, items) in catalog.by_category() {
        writeln!(out, "{category}")?;
        write_items(out, &items)?;
    }

    Ok(())
}

fn write_items(out: &mut impl Write, items: &[&MenuItem]) -> Result<(), CliError> {
    let mut builder = Builder::default();
    builder.push_record(["ID", "品項", "價格", "加麵"]);

    for item in items {
        builder.push_record([
            item.id.to_string(),
            item.name.clone(),
            format_amount(item.price),
            if item.can_add_noodle { "可" } else { "" }.to_string(),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Columns::new(2..3), Alignment::right());

    writeln!(out, "{table}")?;

    Ok(())
}

fn add<S: KeyValueStore>(
    args: AddMenuItemArgs,
    session: &mut Session<S>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let price = parse_price(&args.price)?;
    let item = session.add_menu_item(args.name, price, args.category, args.noodle)?;

    writeln!(
        out,
        "已新增 {} {} {} ({})",
        item.id,
        item.name,
        format_amount(item.price),
        item.category
    )?;

    Ok(())
}

fn update<S: KeyValueStore>(
    args: UpdateMenuItemArgs,
    session: &mut Session<S>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let price = args.price.as_deref().map(parse_price).transpose()?;

    let item = session.update_menu_item(
        &MenuItemId::new(args.id),
        MenuItemUpdate {
            name: args.name,
            price,
        },
    )?;

    writeln!(
        out,
        "已更新 {} {} {}",
        item.id,
        item.name,
        format_amount(item.price)
    )?;

    Ok(())
}

fn parse_category(input: &str) -> Result<Category, String> {
    let input = input.trim();

    let category = match input.to_ascii_lowercase().as_str() {
        "noodles" => Some(Category::Noodles),
        "rice" => Some(Category::RicePorridge),
        "sides" => Some(Category::Sides),
        "soups" => Some(Category::Soups),
        "others" => Some(Category::Others),
        _ => Category::DISPLAY_ORDER
            .into_iter()
            .find(|category| category.label() == input),
    };

    category.ok_or_else(|| format!("unknown category {input:?}"))
}
