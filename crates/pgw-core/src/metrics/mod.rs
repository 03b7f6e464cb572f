//! Self-instrumentation of the publisher.
//!
//! Backends (prometheus, statsd, etc) implement [`MetricsBackend`] and are injected into the
//! [`crate::Publisher`] and [`crate::ConnectionPool`].
mod backend;
pub use backend::{AttemptOutcome, MetricsBackend, MetricsHandle, PublishOutcome};

mod noop;
pub use noop::NoOpMetrics;

use std::sync::Arc;

/// Create a no-op metrics handle.
#[inline]
pub fn noop_metrics() -> MetricsHandle {
    Arc::new(NoOpMetrics)
}
