use std::io::Write;

use clap::Args;
use nabeyaki_app::{session::Session, store::KeyValueStore};

use super::CliError;

#[derive(Debug, Args)]
pub(crate) struct CloseOutArgs {
    /// Confirm that every completed order should be dropped
    #[arg(long)]
    yes: bool,
}

pub(crate) fn run<S: KeyValueStore>(
    args: &CloseOutArgs,
    session: &mut Session<S>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    if !args.yes {
        return Err(CliError::NotConfirmed);
    }

    let count = session.close_out_day()?;

    writeln!(out, "已清除 {count} 筆訂單")?;

    Ok(())
}
