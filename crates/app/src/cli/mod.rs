use std::{
    io::{self, Write},
    path::PathBuf,
};

use clap::{Parser, Subcommand};
use nabeyaki::{
    cart::{Cart, CartEntryKey, CartError},
    menu::CatalogError,
    reports::ReportError,
};
use nabeyaki_app::{
    config::{AppConfig, ConfigError},
    observability::{ObservabilityError, init_logging},
    session::{Session, SessionError},
    store::{FileStore, KeyValueStore},
};
use thiserror::Error;

mod cart;
mod checkout;
mod close_out;
mod export;
mod menu;
mod orders;
mod report;

#[derive(Debug, Parser)]
#[command(name = "nabeyaki", about = "Noodle shop ordering", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    config: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Browse and edit the menu
    Menu(menu::MenuCommand),

    /// Build up the next order
    Cart(cart::CartCommand),

    /// Place the cart as an order
    Checkout(checkout::CheckoutArgs),

    /// Review and amend completed orders
    Orders(orders::OrdersCommand),

    /// Sales report for one day
    Report(report::ReportArgs),

    /// Order lines as a table or JSON
    Export(export::ExportArgs),

    /// Drop every completed order
    CloseOut(close_out::CloseOutArgs),
}

#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Observability(#[from] ObservabilityError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error("failed to render output")]
    Report(#[from] ReportError),

    #[error("failed to write output")]
    Io(#[from] io::Error),

    #[error("failed to write {path}")]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode export")]
    Json(#[from] serde_json::Error),

    #[error("no line at position {0}")]
    NoSuchLine(usize),

    #[error("closing out drops every order; pass --yes to confirm")]
    NotConfirmed,
}

impl Cli {
    pub(crate) fn run(self) -> Result<(), CliError> {
        init_logging(&self.config.logging)?;

        let time_zone = self.config.time_zone()?;
        let store = FileStore::new(&self.config.data_dir);
        let mut session = Session::open(store, time_zone)?;

        let stdout = io::stdout();
        let mut out = stdout.lock();

        self.command.run(&mut session, &mut out)
    }
}

impl Commands {
    fn run<S: KeyValueStore>(
        self,
        session: &mut Session<S>,
        out: &mut impl Write,
    ) -> Result<(), CliError> {
        match self {
            Commands::Menu(command) => menu::run(command, session, out),
            Commands::Cart(command) => cart::run(command, session, out),
            Commands::Checkout(args) => checkout::run(args, session, out),
            Commands::Orders(command) => orders::run(command, session, out),
            Commands::Report(args) => report::run(&args, session, out),
            Commands::Export(args) => export::run(args, session, out),
            Commands::CloseOut(args) => close_out::run(&args, session, out),
        }
    }
}

/// Resolve a 1-based display position to a cart entry.
fn entry_at(cart: &Cart, position: usize) -> Result<CartEntryKey, CliError> {
    position
        .checked_sub(1)
        .and_then(|index| cart.key_at(index))
        .ok_or(CliError::NoSuchLine(position))
}
