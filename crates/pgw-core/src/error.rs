use std::time::Duration;

use pgw_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("decode error: {0}")]
    Decode(String),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("connection selection failed: {0}")]
    ConnectionSelection(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("pushgateway responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("push failed after {attempts} attempt(s): {last}")]
    Exhausted { attempts: u32, last: String },
}

impl PublishError {
    /// Returns `true` if another attempt may succeed.
    ///
    /// Connection, transport and timeout failures are transient, as are `5xx` and `429` responses.
    /// Every other status means the gateway rejected the body itself.
    pub fn is_retryable(&self) -> bool {
        match self {
            PublishError::ConnectionSelection(_)
            | PublishError::Transport(_)
            | PublishError::Timeout(_) => true,
            PublishError::Status { status, .. } => *status >= 500 || *status == 429,
            PublishError::Decode(_)
            | PublishError::InvalidConfiguration(_)
            | PublishError::Exhausted { .. } => false,
        }
    }
}

impl From<ModelError> for PublishError {
    fn from(e: ModelError) -> Self {
        if e.is_decode() {
            PublishError::Decode(e.to_string())
        } else {
            PublishError::InvalidConfiguration(e.to_string())
        }
    }
}
