mod config;
mod error;
mod install;
mod object;

pub use config::LoggerConfig;
pub use error::{LoggerError, LoggerResult};
pub use object::{LoggerFormat, LoggerLevel, LoggerRfc3339};

/// Environment variable overriding the configured filter expression.
pub const LOG_FILTER_ENV: &str = "PGW_LOG";

/// Installs the global tracing subscriber described by `cfg`.
///
/// Returns [`LoggerError::AlreadyInitialized`] when a subscriber is already set.
///
/// # Examples
/// ```rust
/// use pgw_observe::{LoggerConfig, init_logger};
///
/// init_logger(&LoggerConfig::default()).expect("logger");
/// tracing::warn!("publisher ready");
/// ```
pub fn init_logger(cfg: &LoggerConfig) -> LoggerResult<()> {
    match cfg.format {
        LoggerFormat::Text => install::text(cfg),
        LoggerFormat::Json => install::json(cfg),
        LoggerFormat::Journald => install::journald(cfg),
    }
}
