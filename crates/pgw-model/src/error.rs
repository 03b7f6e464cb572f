use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to decode metric batch: {0}")]
    Decode(String),

    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("missing required option: {0}")]
    MissingOption(&'static str),

    #[error("invalid option '{key}': {reason}")]
    InvalidOption { key: &'static str, reason: String },

    #[error("unknown jitter strategy: {0}")]
    UnknownJitter(String),

    #[error("unknown log level: {0} (expected: warn|error|info|debug)")]
    UnknownLogLevel(String),
}

impl ModelError {
    /// Returns `true` for errors raised while decoding an inbound batch.
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            ModelError::Decode(_) | ModelError::UnsupportedContentType(_)
        )
    }
}

pub type ModelResult<T> = Result<T, ModelError>;
