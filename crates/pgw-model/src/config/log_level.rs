use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Verbosity requested by the publisher configuration.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublisherLogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
}

impl PublisherLogLevel {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            PublisherLogLevel::Error => "error",
            PublisherLogLevel::Warn => "warn",
            PublisherLogLevel::Info => "info",
            PublisherLogLevel::Debug => "debug",
        }
    }
}

impl fmt::Display for PublisherLogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PublisherLogLevel {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "warn" => Ok(PublisherLogLevel::Warn),
            "error" => Ok(PublisherLogLevel::Error),
            "debug" => Ok(PublisherLogLevel::Debug),
            "info" => Ok(PublisherLogLevel::Info),
            other => Err(ModelError::UnknownLogLevel(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PublisherLogLevel;

    #[test]
    fn parses_known_levels() {
        for (raw, lvl) in [
            ("warn", PublisherLogLevel::Warn),
            ("ERROR", PublisherLogLevel::Error),
            ("Debug", PublisherLogLevel::Debug),
            (" info ", PublisherLogLevel::Info),
        ] {
            assert_eq!(raw.parse::<PublisherLogLevel>().unwrap(), lvl);
        }
    }

    #[test]
    fn rejects_unknown_levels() {
        assert!("trace".parse::<PublisherLogLevel>().is_err());
        assert!("verbose".parse::<PublisherLogLevel>().is_err());
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(PublisherLogLevel::Warn.to_string(), "warn");
    }
}
