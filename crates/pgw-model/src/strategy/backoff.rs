use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Exponential backoff parameters applied between failed push attempts.
///
/// The n-th delay (0-based) is `first_ms * factor^n`, capped at `max_ms`, with `jitter` applied on top.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackoffStrategy {
    pub jitter: super::JitterStrategy,
    pub first_ms: u64,
    pub max_ms: u64,
    pub factor: f64,
}

impl Default for BackoffStrategy {
    fn default() -> Self {
        Self {
            jitter: super::JitterStrategy::Equal,
            first_ms: 500,
            max_ms: 60_000,
            factor: 1.5,
        }
    }
}

impl BackoffStrategy {
    /// Check that the parameters describe a non-shrinking, bounded sequence.
    pub fn validate(&self) -> ModelResult<()> {
        if !self.factor.is_finite() || self.factor < 1.0 {
            return Err(ModelError::InvalidOption {
                key: "backoff_factor",
                reason: format!("must be a finite number >= 1.0, got {}", self.factor),
            });
        }
        if self.first_ms > self.max_ms {
            return Err(ModelError::InvalidOption {
                key: "backoff_first_ms",
                reason: format!(
                    "first delay {}ms exceeds max delay {}ms",
                    self.first_ms, self.max_ms
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JitterStrategy;

    #[test]
    fn default_is_valid() {
        let b = BackoffStrategy::default();
        assert_eq!(b.first_ms, 500);
        assert_eq!(b.max_ms, 60_000);
        assert_eq!(b.jitter, JitterStrategy::Equal);
        assert!(b.validate().is_ok());
    }

    #[test]
    fn rejects_shrinking_factor() {
        let b = BackoffStrategy {
            factor: 0.5,
            ..Default::default()
        };
        assert!(matches!(
            b.validate(),
            Err(ModelError::InvalidOption { key: "backoff_factor", .. })
        ));
    }

    #[test]
    fn rejects_first_above_max() {
        let b = BackoffStrategy {
            first_ms: 10_000,
            max_ms: 1_000,
            ..Default::default()
        };
        assert!(b.validate().is_err());
    }

    #[test]
    fn serde_partial_uses_defaults() {
        let b: BackoffStrategy = serde_json::from_str(r#"{"firstMs": 100, "jitter": "none"}"#).unwrap();
        assert_eq!(b.first_ms, 100);
        assert_eq!(b.jitter, JitterStrategy::None);
        assert_eq!(b.max_ms, 60_000);
    }
}
