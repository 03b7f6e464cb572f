use crate::metrics::backend::{AttemptOutcome, MetricsBackend, PublishOutcome};

/// No-op metrics backend that compiles to nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetrics;

impl MetricsBackend for NoOpMetrics {
    #[inline(always)]
    fn record_push_attempt(&self, _: &str, _: AttemptOutcome) {}

    #[inline(always)]
    fn record_publish(&self, _: &str, _: PublishOutcome, _: u64) {}

    #[inline(always)]
    fn record_pool_evictions(&self, _: usize) {}
}
