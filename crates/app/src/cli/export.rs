use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};

use clap::Args;
use jiff::civil::Date;
use nabeyaki::export::{ExportRow, write_table};
use nabeyaki_app::{session::Session, store::KeyValueStore};

use super::CliError;

/// Export output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum ExportFormat {
    /// Table, one row per order line.
    Table,

    /// JSON array of rows keyed by column heading.
    Json,
}

#[derive(Debug, Args)]
pub(crate) struct ExportArgs {
    /// Only orders of this business day, YYYY-MM-DD; every order when omitted
    #[arg(long)]
    date: Option<Date>,

    /// Output format
    #[arg(long, value_enum, default_value_t = ExportFormat::Table)]
    format: ExportFormat,

    /// Write to this file instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

pub(crate) fn run<S: KeyValueStore>(
    args: ExportArgs,
    session: &Session<S>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let rows = session.export(args.date);

    let Some(path) = args.out else {
        return write_rows(out, args.format, &rows);
    };

    let file = File::create(&path).map_err(|source| CliError::Output {
        path: path.clone(),
        source,
    })?;

    let mut writer = BufWriter::new(file);

    write_rows(&mut writer, args.format, &rows)?;

    writer.flush().map_err(|source| CliError::Output {
        path: path.clone(),
        source,
    })?;

    writeln!(out, "已匯出 {} 筆資料至 {}", rows.len(), path.display())?;

    Ok(())
}

fn write_rows(
    out: &mut impl Write,
    format: ExportFormat,
    rows: &[ExportRow],
) -> Result<(), CliError> {
    match format {
        ExportFormat::Table => write_table(out, rows)?,
        ExportFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, rows)?;
            writeln!(out)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use nabeyaki::{ledger::OrderType, menu::MenuItemId};
    use testresult::TestResult;

    use crate::cli::tests as cli;

    #[test]
    fn export_json_to_a_file() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("orders.json");
        let mut session = cli::session()?;

        session.add_to_cart(&MenuItemId::from("n10"), true)?;
        session.add_to_cart(&MenuItemId::from("t5"), false)?;
        session.checkout(OrderType::Takeout, "")?;

        let message = cli::run(
            &mut session,
            &[
                "export",
                "--format",
                "json",
                "--out",
                path.to_str().ok_or("non-UTF-8 temp path")?,
            ],
        )?;

        assert!(message.contains("2"));

        let rows: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
        let rows = rows.as_array().ok_or("export should be an array")?;

        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows.first().and_then(|row| row.get("加麵")),
            Some(&serde_json::Value::from("是"))
        );

        Ok(())
    }

    #[test]
    fn export_table_to_stdout() -> TestResult {
        let mut session = cli::session()?;

        session.add_to_cart(&MenuItemId::from("s11"), false)?;
        session.checkout(OrderType::DineIn, "2號桌")?;

        let table = cli::run(&mut session, &["export"])?;

        assert!(table.contains("訂單總額"));
        assert!(table.contains("2號桌"));

        Ok(())
    }
}
