use std::io::IsTerminal;

use pgw_model::PublishConfig;
use serde::{Deserialize, Serialize};

use crate::logger::object::{LoggerFormat, LoggerLevel};

/// Logger configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Output format.
    pub format: LoggerFormat,
    /// Filter expression (e.g. `"warn"`, `"pgw_core=debug,warn"`).
    pub level: LoggerLevel,
    /// Include module targets in text and json output.
    pub with_targets: bool,
    /// Colored text output; still disabled when stdout is not a terminal.
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::default(),
            level: LoggerLevel::default(),
            with_targets: true,
            use_color: true,
        }
    }
}

impl LoggerConfig {
    /// Logger settings matching the verbosity selected in a publish configuration.
    pub fn for_publisher(config: &PublishConfig, format: LoggerFormat) -> Self {
        Self {
            format,
            level: LoggerLevel::from(config.effective_log_level()),
            ..Default::default()
        }
    }

    pub fn should_use_color(&self) -> bool {
        self.use_color && std::io::stdout().is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use pgw_model::PublisherLogLevel;

    use super::*;

    #[test]
    fn default_values() {
        let config = LoggerConfig::default();

        assert_eq!(config.format, LoggerFormat::Text);
        assert_eq!(config.level.as_str(), "warn");
        assert!(config.with_targets);
        assert!(config.use_color);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: LoggerConfig = serde_json::from_str(r#"{"format": "json"}"#).unwrap();

        assert_eq!(config.format, LoggerFormat::Json);
        assert_eq!(config.level.as_str(), "warn");
        assert!(config.use_color);
    }

    #[test]
    fn invalid_filter_is_rejected_on_load() {
        let res = serde_json::from_str::<LoggerConfig>(r#"{"level": "pgw_core=loud"}"#);
        assert!(res.is_err());
    }

    #[test]
    fn debug_flag_wins_over_log_level() {
        let mut publish = PublishConfig::new("gw", 9091);
        publish.log_level = Some(PublisherLogLevel::Error);
        assert_eq!(
            LoggerConfig::for_publisher(&publish, LoggerFormat::Json).level.as_str(),
            "error"
        );

        publish.debug = true;
        let config = LoggerConfig::for_publisher(&publish, LoggerFormat::Json);
        assert_eq!(config.level.as_str(), "debug");
        assert_eq!(config.format, LoggerFormat::Json);
    }
}
