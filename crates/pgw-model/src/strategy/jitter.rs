use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Randomization of the delay between two push attempts.
///
/// Several agents pushing to one gateway tend to fail together when it goes
/// down; jitter keeps their retries from landing in the same instant.
/// Accepted through the `backoff_jitter` option by name (see [`JitterStrategy::as_str`]).
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JitterStrategy {
    /// Exact exponential delays.
    None,
    /// Anywhere in `[0, delay]`.
    Full,
    /// Upper half of the delay.
    #[default]
    Equal,
    /// Grows from the previous actual delay, bounded by the first and max delays.
    Decorrelated,
}

impl JitterStrategy {
    /// Canonical option value.
    pub fn as_str(&self) -> &'static str {
        match self {
            JitterStrategy::None => "none",
            JitterStrategy::Full => "full",
            JitterStrategy::Equal => "equal",
            JitterStrategy::Decorrelated => "decorrelated",
        }
    }
}

impl fmt::Display for JitterStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JitterStrategy {
    type Err = ModelError;

    /// Empty input means no jitter; `default` selects [`JitterStrategy::Equal`].
    fn from_str(s: &str) -> ModelResult<Self> {
        let norm = s.trim().to_ascii_lowercase();
        match norm.as_str() {
            "" => Ok(JitterStrategy::None),
            "default" => Ok(JitterStrategy::default()),
            _ => [
                JitterStrategy::None,
                JitterStrategy::Full,
                JitterStrategy::Equal,
                JitterStrategy::Decorrelated,
            ]
            .into_iter()
            .find(|j| j.as_str() == norm)
            .ok_or(ModelError::UnknownJitter(norm)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::JitterStrategy;

    #[test]
    fn canonical_names_parse_back() {
        for j in [
            JitterStrategy::None,
            JitterStrategy::Full,
            JitterStrategy::Equal,
            JitterStrategy::Decorrelated,
        ] {
            assert_eq!(j.to_string().parse::<JitterStrategy>().unwrap(), j);
        }
    }

    #[test]
    fn parsing_ignores_case_and_padding() {
        assert_eq!(" FULL ".parse::<JitterStrategy>().unwrap(), JitterStrategy::Full);
        assert_eq!("".parse::<JitterStrategy>().unwrap(), JitterStrategy::None);
        assert_eq!("default".parse::<JitterStrategy>().unwrap(), JitterStrategy::Equal);
    }

    #[test]
    fn unknown_name_is_reported() {
        let err = "gaussian".parse::<JitterStrategy>().unwrap_err();
        assert!(err.to_string().contains("gaussian"));
    }
}
