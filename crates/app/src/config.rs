//! Application configuration
//!
//! Settings come from command-line flags, then the environment, then a `.env`
//! file in the working directory.

use std::path::PathBuf;

use clap::Args;
use jiff::tz::TimeZone;
use thiserror::Error;

/// Errors raised while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configured time zone is not in the time zone database.
    #[error("unknown time zone {name:?}")]
    TimeZone {
        /// Configured name
        name: String,

        /// Lookup error
        #[source]
        source: jiff::Error,
    },
}

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Shop settings.
#[derive(Debug, Args)]
pub struct AppConfig {
    /// Directory holding the cart, orders and menu files
    #[arg(long, env = "NABEYAKI_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// IANA time zone used to assign orders to business days
    #[arg(long, env = "NABEYAKI_TIME_ZONE", default_value = "Asia/Taipei")]
    pub time_zone: String,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Resolve the configured time zone.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not a known time zone.
    pub fn time_zone(&self) -> Result<TimeZone, ConfigError> {
        TimeZone::get(&self.time_zone).map_err(|source| ConfigError::TimeZone {
            name: self.time_zone.clone(),
            source,
        })
    }
}
