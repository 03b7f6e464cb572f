use std::sync::Arc;

use prometheus::{
    CounterVec, Encoder, HistogramOpts, HistogramVec, IntCounter, Opts, Registry, TextEncoder,
    proto::MetricFamily,
};

use pgw_core::{AttemptOutcome, MetricsBackend, PublishOutcome};

const NAMESPACE: &str = "pgw";

/// Prometheus metrics backend for the publisher.
///
/// ## Label cardinality
/// - `job`: one value per configured pushgateway job
/// - `outcome`: the fixed labels of [`AttemptOutcome`] and [`PublishOutcome`]
#[derive(Clone)]
pub struct PrometheusMetrics {
    push_attempts: CounterVec,
    publishes: CounterVec,
    publish_duration: HistogramVec,
    pool_evictions: IntCounter,
    registry: Arc<Registry>,
}

impl PrometheusMetrics {
    /// Create the backend and register its series in `registry`.
    pub fn new_with_registry(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        let push_attempts = CounterVec::new(
            Opts::new("push_attempts_total", "Push requests attempted, by outcome")
                .namespace(NAMESPACE),
            &["job", "outcome"],
        )?;
        registry.register(Box::new(push_attempts.clone()))?;

        let publishes = CounterVec::new(
            Opts::new("publishes_total", "Publish calls finished, by outcome").namespace(NAMESPACE),
            &["job", "outcome"],
        )?;
        registry.register(Box::new(publishes.clone()))?;

        let publish_duration = HistogramVec::new(
            HistogramOpts::new(
                "publish_duration_seconds",
                "Publish call duration including retries and backoff",
            )
            .namespace(NAMESPACE)
            .buckets(vec![0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 15.0, 60.0, 300.0]),
            &["job"],
        )?;
        registry.register(Box::new(publish_duration.clone()))?;

        let pool_evictions = IntCounter::with_opts(
            Opts::new("pool_evictions_total", "Idle pushgateway connections evicted")
                .namespace(NAMESPACE),
        )?;
        registry.register(Box::new(pool_evictions.clone()))?;

        Ok(Self {
            push_attempts,
            publishes,
            publish_duration,
            pool_evictions,
            registry,
        })
    }

    /// Create the backend with a fresh registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::new_with_registry(Arc::new(Registry::new()))
    }

    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Render every series in the text exposition format.
    pub fn encode_text(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buf = Vec::new();
        encoder.encode(&self.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

impl MetricsBackend for PrometheusMetrics {
    fn record_push_attempt(&self, job: &str, outcome: AttemptOutcome) {
        self.push_attempts
            .with_label_values(&[job, outcome.as_label()])
            .inc();
    }

    fn record_publish(&self, job: &str, outcome: PublishOutcome, duration_ms: u64) {
        self.publishes
            .with_label_values(&[job, outcome.as_label()])
            .inc();
        self.publish_duration
            .with_label_values(&[job])
            .observe(duration_ms as f64 / 1000.0);
    }

    fn record_pool_evictions(&self, evicted: usize) {
        if evicted > 0 {
            self.pool_evictions.inc_by(evicted as u64);
        }
    }
}
