use std::io::Write;

use clap::Args;
use jiff::civil::Date;
use nabeyaki_app::{session::Session, store::KeyValueStore};

use super::CliError;

#[derive(Debug, Args)]
pub(crate) struct ReportArgs {
    /// Business day, YYYY-MM-DD; today when omitted
    #[arg(long)]
    date: Option<Date>,
}

pub(crate) fn run<S: KeyValueStore>(
    args: &ReportArgs,
    session: &Session<S>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let date = args.date.unwrap_or_else(|| session.today());

    session
        .daily_report(date)
        .write_to(out, session.time_zone())?;

    Ok(())
}
