use std::sync::Arc;

use crate::error::PublishError;

/// Outcome of a single push attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Gateway accepted the body.
    Delivered,
    /// No connection could be selected from the pool.
    ConnectFailed,
    /// Network failure or timeout.
    TransportFailed,
    /// Gateway answered with a non-success status.
    Rejected,
}

impl AttemptOutcome {
    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            AttemptOutcome::Delivered => "delivered",
            AttemptOutcome::ConnectFailed => "connect_failed",
            AttemptOutcome::TransportFailed => "transport_failed",
            AttemptOutcome::Rejected => "rejected",
        }
    }

    /// Classify a failed attempt.
    pub fn from_error(error: &PublishError) -> Self {
        match error {
            PublishError::ConnectionSelection(_) => AttemptOutcome::ConnectFailed,
            PublishError::Status { .. } => AttemptOutcome::Rejected,
            _ => AttemptOutcome::TransportFailed,
        }
    }
}

/// Outcome of a whole publish call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Batch delivered.
    Delivered,
    /// Every attempt failed with a transient error.
    Exhausted,
    /// Gateway rejected the batch with a final status.
    Rejected,
    /// Batch or configuration could not be used at all.
    Invalid,
}

impl PublishOutcome {
    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            PublishOutcome::Delivered => "delivered",
            PublishOutcome::Exhausted => "exhausted",
            PublishOutcome::Rejected => "rejected",
            PublishOutcome::Invalid => "invalid",
        }
    }
}

impl From<&Result<(), PublishError>> for PublishOutcome {
    fn from(result: &Result<(), PublishError>) -> Self {
        match result {
            Ok(()) => PublishOutcome::Delivered,
            Err(PublishError::Status { .. }) => PublishOutcome::Rejected,
            Err(PublishError::Decode(_) | PublishError::InvalidConfiguration(_)) => {
                PublishOutcome::Invalid
            }
            Err(_) => PublishOutcome::Exhausted,
        }
    }
}

/// Backend metrics collection interface.
///
/// This trait abstracts metrics collection across different backends.
/// Implementations must be cheap: they are called on the publish path.
pub trait MetricsBackend: Send + Sync + 'static {
    /// Record one push attempt.
    ///
    /// # Arguments
    /// - `job`: Pushgateway job of the call
    /// - `outcome`: How the attempt ended
    fn record_push_attempt(&self, job: &str, outcome: AttemptOutcome);
    /// Record a finished publish call with its outcome and duration.
    ///
    /// The duration includes every attempt and backoff sleep.
    fn record_publish(&self, job: &str, outcome: PublishOutcome, duration_ms: u64);
    /// Record connections evicted by one reaper sweep.
    fn record_pool_evictions(&self, evicted: usize);
}

/// Shared handle to metrics backend.
pub type MetricsHandle = Arc<dyn MetricsBackend>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_outcome_from_result() {
        assert_eq!(PublishOutcome::from(&Ok::<(), PublishError>(())), PublishOutcome::Delivered);
        assert_eq!(
            PublishOutcome::from(&Err(PublishError::Status {
                status: 400,
                body: String::new()
            })),
            PublishOutcome::Rejected
        );
        assert_eq!(
            PublishOutcome::from(&Err(PublishError::InvalidConfiguration("x".into()))),
            PublishOutcome::Invalid
        );
        assert_eq!(
            PublishOutcome::from(&Err(PublishError::Exhausted {
                attempts: 3,
                last: "x".into()
            })),
            PublishOutcome::Exhausted
        );
    }

    #[test]
    fn attempt_outcome_from_error() {
        assert_eq!(
            AttemptOutcome::from_error(&PublishError::ConnectionSelection("x".into())),
            AttemptOutcome::ConnectFailed
        );
        assert_eq!(
            AttemptOutcome::from_error(&PublishError::Timeout(std::time::Duration::from_secs(1))),
            AttemptOutcome::TransportFailed
        );
    }
}
