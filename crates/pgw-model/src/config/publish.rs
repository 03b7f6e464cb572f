use std::time::Duration;

use serde::Deserialize;

use crate::{
    BackoffStrategy, DEFAULT_JOB, JitterStrategy, PublisherLogLevel,
    config::{ConfigMap, ConfigValue},
    error::{ModelError, ModelResult},
};

const DEFAULT_RETRIES: u32 = 10;
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Resolved configuration of one publish call.
///
/// Built once at call entry from the host supplied [`ConfigMap`] (see [`PublishConfig::from_values`])
/// or deserialized from a JSON object with the same option names.
///
/// Options:
/// - `host`, `port`, `https`, `debug` are required.
/// - `job` defaults to `"unused"`, `instance` to empty (no instance path segment).
/// - `retries` (default 10) is the maximum number of attempts and must be at least 1.
/// - `timeout_secs` (default 10, at least 1) bounds each HTTP attempt.
/// - `replace` (default false) pushes with `POST` (replace) instead of `PUT` (merge).
/// - `log-level` optionally selects verbosity when `debug` is off.
/// - `backoff_first_ms`, `backoff_max_ms`, `backoff_factor`, `backoff_jitter` tune retry delays.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "ConfigMap")]
pub struct PublishConfig {
    pub host: String,
    pub port: u16,
    pub https: bool,
    pub debug: bool,
    pub job: String,
    pub instance: String,
    pub retries: u32,
    pub timeout_secs: u64,
    pub replace: bool,
    pub log_level: Option<PublisherLogLevel>,
    pub backoff: BackoffStrategy,
}

impl PublishConfig {
    /// Create a plain-http configuration for `host:port` with all defaults applied.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            https: false,
            debug: false,
            job: DEFAULT_JOB.to_string(),
            instance: String::new(),
            retries: DEFAULT_RETRIES,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            replace: false,
            log_level: None,
            backoff: BackoffStrategy::default(),
        }
    }

    /// Resolve a host supplied option map into a typed configuration.
    ///
    /// Unknown options are ignored. A required option that is missing, or any
    /// option carrying the wrong variant or an out-of-range value, is rejected.
    pub fn from_values(values: &ConfigMap) -> ModelResult<Self> {
        let opts = Options(values);
        let defaults = BackoffStrategy::default();

        let port = opts.required_int("port")?;
        let port = u16::try_from(port)
            .ok()
            .filter(|p| *p != 0)
            .ok_or_else(|| ModelError::InvalidOption {
                key: "port",
                reason: format!("{port} is not a valid tcp port"),
            })?;

        let retries = opts.int("retries")?.unwrap_or(i64::from(DEFAULT_RETRIES));
        let retries = u32::try_from(retries).map_err(|_| ModelError::InvalidOption {
            key: "retries",
            reason: format!("{retries} is out of range"),
        })?;

        let timeout_secs = opts.int("timeout_secs")?.unwrap_or(DEFAULT_TIMEOUT_SECS as i64);
        let timeout_secs = u64::try_from(timeout_secs).map_err(|_| ModelError::InvalidOption {
            key: "timeout_secs",
            reason: format!("{timeout_secs} must not be negative"),
        })?;

        let log_level: Option<PublisherLogLevel> =
            opts.str("log-level")?.map(str::parse).transpose()?;

        let backoff = BackoffStrategy {
            jitter: opts
                .str("backoff_jitter")?
                .map(str::parse::<JitterStrategy>)
                .transpose()?
                .unwrap_or(defaults.jitter),
            first_ms: opts.millis("backoff_first_ms")?.unwrap_or(defaults.first_ms),
            max_ms: opts.millis("backoff_max_ms")?.unwrap_or(defaults.max_ms),
            factor: opts.float("backoff_factor")?.unwrap_or(defaults.factor),
        };

        let cfg = Self {
            host: opts.required_str("host")?.to_string(),
            port,
            https: opts.required_bool("https")?,
            debug: opts.required_bool("debug")?,
            job: opts.str("job")?.unwrap_or(DEFAULT_JOB).to_string(),
            instance: opts.str("instance")?.unwrap_or_default().to_string(),
            retries,
            timeout_secs,
            replace: opts.bool("replace")?.unwrap_or(false),
            log_level,
            backoff,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> ModelResult<()> {
        if self.host.trim().is_empty() {
            return Err(ModelError::InvalidOption {
                key: "host",
                reason: "must not be empty".to_string(),
            });
        }
        if self.retries == 0 {
            return Err(ModelError::InvalidOption {
                key: "retries",
                reason: "at least one attempt is required".to_string(),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ModelError::InvalidOption {
                key: "timeout_secs",
                reason: "every request needs a timeout of at least one second".to_string(),
            });
        }
        self.backoff.validate()
    }

    /// URL scheme selected by the `https` flag.
    #[inline]
    pub fn scheme(&self) -> &'static str {
        if self.https { "https" } else { "http" }
    }

    /// Per-request timeout.
    #[inline]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Verbosity to run with: `debug` wins, then `log-level`, then `warn`.
    pub fn effective_log_level(&self) -> PublisherLogLevel {
        if self.debug {
            return PublisherLogLevel::Debug;
        }
        self.log_level.unwrap_or_default()
    }
}

impl TryFrom<ConfigMap> for PublishConfig {
    type Error = ModelError;
    fn try_from(values: ConfigMap) -> ModelResult<Self> {
        Self::from_values(&values)
    }
}

/// Typed lookups over a raw option map.
struct Options<'a>(&'a ConfigMap);

impl<'a> Options<'a> {
    fn get(&self, key: &'static str) -> Option<&'a ConfigValue> {
        self.0.get(key)
    }

    fn str(&self, key: &'static str) -> ModelResult<Option<&'a str>> {
        match self.get(key) {
            None => Ok(None),
            Some(ConfigValue::Str(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(mismatch(key, "string", other)),
        }
    }

    fn int(&self, key: &'static str) -> ModelResult<Option<i64>> {
        match self.get(key) {
            None => Ok(None),
            Some(ConfigValue::Int(i)) => Ok(Some(*i)),
            Some(other) => Err(mismatch(key, "integer", other)),
        }
    }

    fn float(&self, key: &'static str) -> ModelResult<Option<f64>> {
        match self.get(key) {
            None => Ok(None),
            Some(ConfigValue::Float(f)) => Ok(Some(*f)),
            Some(ConfigValue::Int(i)) => Ok(Some(*i as f64)),
            Some(other) => Err(mismatch(key, "float", other)),
        }
    }

    fn bool(&self, key: &'static str) -> ModelResult<Option<bool>> {
        match self.get(key) {
            None => Ok(None),
            Some(ConfigValue::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(mismatch(key, "bool", other)),
        }
    }

    fn millis(&self, key: &'static str) -> ModelResult<Option<u64>> {
        self.int(key)?
            .map(|ms| {
                u64::try_from(ms).map_err(|_| ModelError::InvalidOption {
                    key,
                    reason: format!("{ms} must not be negative"),
                })
            })
            .transpose()
    }

    fn required_str(&self, key: &'static str) -> ModelResult<&'a str> {
        self.str(key)?.ok_or(ModelError::MissingOption(key))
    }

    fn required_int(&self, key: &'static str) -> ModelResult<i64> {
        self.int(key)?.ok_or(ModelError::MissingOption(key))
    }

    fn required_bool(&self, key: &'static str) -> ModelResult<bool> {
        self.bool(key)?.ok_or(ModelError::MissingOption(key))
    }
}

fn mismatch(key: &'static str, expected: &str, got: &ConfigValue) -> ModelError {
    ModelError::InvalidOption {
        key,
        reason: format!("expected {expected}, got {}", got.kind()),
    }
}
