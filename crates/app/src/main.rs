//! Nabeyaki command-line front end

use std::{error::Error, process::ExitCode};

use clap::Parser;

use crate::cli::Cli;

mod cli;

fn main() -> ExitCode {
    // Load .env file if present (ignore if missing)
    _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(error) = cli.run() {
        #[expect(
            clippy::print_stderr,
            reason = "errors are reported to the operator, logging may not be initialised"
        )]
        {
            eprintln!("error: {}", error_chain(&error));
        }

        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn error_chain(error: &dyn Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();

    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    message
}
