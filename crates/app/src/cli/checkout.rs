use std::io::Write;

use clap::Args;
use nabeyaki::{ledger::OrderType, receipt::Receipt};
use nabeyaki_app::{session::Session, store::KeyValueStore};

use super::CliError;

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Takeout rather than dine-in
    #[arg(long)]
    takeout: bool,

    /// Customer name or table number
    #[arg(long, default_value = "")]
    customer: String,
}

pub(crate) fn run<S: KeyValueStore>(
    args: CheckoutArgs,
    session: &mut Session<S>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let order_type = if args.takeout {
        OrderType::Takeout
    } else {
        OrderType::DineIn
    };

    let order = session.checkout(order_type, args.customer.trim())?;

    Receipt::new(&order).write_to(out, session.time_zone())?;

    Ok(())
}
