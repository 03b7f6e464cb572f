use tracing::Subscriber;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::logger::{
    LOG_FILTER_ENV,
    config::LoggerConfig,
    error::{LoggerError, LoggerResult},
    object::{LoggerLevel, LoggerRfc3339},
};

/// Configured level, unless the override variable holds a valid filter.
fn effective_level(cfg: &LoggerConfig) -> LoggerLevel {
    match std::env::var(LOG_FILTER_ENV) {
        Ok(raw) if !raw.trim().is_empty() => LoggerLevel::new(raw).unwrap_or_else(|e| {
            eprintln!("ignoring {LOG_FILTER_ENV}: {e}");
            cfg.level.clone()
        }),
        _ => cfg.level.clone(),
    }
}

pub(super) fn text(cfg: &LoggerConfig) -> LoggerResult<()> {
    let layer = fmt::layer()
        .with_ansi(cfg.should_use_color())
        .with_target(cfg.with_targets)
        .with_timer(LoggerRfc3339);

    install(
        tracing_subscriber::registry()
            .with(effective_level(cfg).to_env_filter())
            .with(layer),
    )
}

pub(super) fn json(cfg: &LoggerConfig) -> LoggerResult<()> {
    let layer = fmt::layer()
        .json()
        .with_ansi(false)
        .with_current_span(true)
        .with_target(cfg.with_targets)
        .with_timer(LoggerRfc3339);

    install(
        tracing_subscriber::registry()
            .with(effective_level(cfg).to_env_filter())
            .with(layer),
    )
}

#[cfg(target_os = "linux")]
pub(super) fn journald(cfg: &LoggerConfig) -> LoggerResult<()> {
    let layer = tracing_journald::layer()
        .map_err(|e| LoggerError::JournaldInitFailed(e.to_string()))?
        .with_syslog_identifier("pgw-agentd".to_string());

    install(
        tracing_subscriber::registry()
            .with(effective_level(cfg).to_env_filter())
            .with(layer),
    )
}

#[cfg(not(target_os = "linux"))]
pub(super) fn journald(_cfg: &LoggerConfig) -> LoggerResult<()> {
    Err(LoggerError::JournaldNotSupported)
}

fn install<S>(subscriber: S) -> LoggerResult<()>
where
    S: Subscriber + Send + Sync + 'static,
{
    subscriber
        .try_init()
        .map_err(|_| LoggerError::AlreadyInitialized)
}
