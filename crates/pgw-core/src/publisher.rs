//! Retry/backoff orchestration of one publish call.
use std::sync::Arc;

use hyper::{Method, body::Bytes};
use pgw_model::{MetricRecord, PublishConfig, decode_batch};
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::{
    error::PublishError,
    exposition::{EXPOSITION_CONTENT_TYPE, render_batch},
    map::to_backoff_policy,
    metrics::{AttemptOutcome, MetricsHandle, PublishOutcome, noop_metrics},
    pool::{Connection, ConnectionPool},
    transport::PushRequest,
    url::build_push_url,
};

/// Pushes metric batches to a Pushgateway through a shared [`ConnectionPool`].
///
/// Each call makes up to `retries` attempts. The first attempt reuses the pooled connection,
/// later ones force a fresh one. Failed attempts are separated by exponential backoff.
///
/// Outcome of a call:
/// - `Ok(())` once the gateway answers with a `2xx` status.
/// - [`PublishError::Status`] right away for a non-retryable status (`4xx` except `429`).
/// - [`PublishError::Exhausted`] when every attempt failed with a transient error.
/// - [`PublishError::InvalidConfiguration`] / [`PublishError::Decode`] before any attempt.
#[derive(Clone)]
pub struct Publisher {
    pool: Arc<ConnectionPool>,
    metrics: MetricsHandle,
}

impl Publisher {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self {
            pool,
            metrics: noop_metrics(),
        }
    }

    /// Replace the metrics backend and return updated publisher.
    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    /// Pool used by this publisher.
    pub fn pool(&self) -> &Arc<ConnectionPool> {
        &self.pool
    }

    /// Decode an inbound batch and publish it.
    ///
    /// Decoding failures are returned as [`PublishError::Decode`] without any push attempt.
    pub async fn publish_encoded(
        &self,
        content_type: &str,
        content: &[u8],
        config: &PublishConfig,
    ) -> Result<(), PublishError> {
        let metrics = match decode_batch(content_type, content) {
            Ok(metrics) => metrics,
            Err(e) => {
                warn!(content_type, len = content.len(), error = %e, "failed to decode metric batch");
                let result = Err(PublishError::from(e));
                self.metrics
                    .record_publish(&config.job, PublishOutcome::from(&result), 0);
                return result;
            }
        };
        self.publish(&metrics, config).await
    }

    /// Publish one batch.
    #[instrument(level = "debug", skip_all, fields(job = %config.job, metrics = metrics.len()))]
    pub async fn publish(
        &self,
        metrics: &[MetricRecord],
        config: &PublishConfig,
    ) -> Result<(), PublishError> {
        let started = Instant::now();
        let result = self.deliver(metrics, config).await;

        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.metrics
            .record_publish(&config.job, PublishOutcome::from(&result), elapsed_ms);
        result
    }

    async fn deliver(
        &self,
        metrics: &[MetricRecord],
        config: &PublishConfig,
    ) -> Result<(), PublishError> {
        config.validate()?;
        let url = build_push_url(config)?;
        let body = Bytes::from(render_batch(metrics));
        let method = if config.replace {
            Method::POST
        } else {
            Method::PUT
        };

        let retries = config.retries;
        let policy = to_backoff_policy(&config.backoff);
        let mut prev_delay = None;
        let mut last_error = None;

        for attempt in 0..retries {
            let force_refresh = attempt > 0;

            let outcome = match self.pool.select_url(&url, config.timeout(), force_refresh) {
                Ok(conn) => {
                    let request = PushRequest {
                        method: method.clone(),
                        url: url.clone(),
                        content_type: EXPOSITION_CONTENT_TYPE,
                        body: body.clone(),
                    };
                    self.push(&conn, request).await
                }
                Err(e) => {
                    warn!(attempt = attempt + 1, retries, error = %e, "could not select a pushgateway connection");
                    Err(e)
                }
            };

            match outcome {
                Ok(()) => {
                    self.metrics
                        .record_push_attempt(&config.job, AttemptOutcome::Delivered);
                    info!(url = %url, attempt = attempt + 1, retries, metrics = metrics.len(), "metrics pushed to pushgateway");
                    return Ok(());
                }
                Err(e) => {
                    self.metrics
                        .record_push_attempt(&config.job, AttemptOutcome::from_error(&e));
                    if !e.is_retryable() {
                        warn!(url = %url, attempt = attempt + 1, retries, error = %e, "pushgateway rejected metrics");
                        return Err(e);
                    }
                    last_error = Some(e);
                }
            }

            if attempt + 1 < retries {
                let delay = policy.next(prev_delay);
                // Full jitter may draw zero; growth restarts from `first` instead of staying there.
                prev_delay = Some(delay.max(policy.first));
                debug!(delay_ms = delay.as_millis() as u64, jitter = %config.backoff.jitter, "backing off next pushgateway request");
                tokio::time::sleep(delay).await;
            }
        }

        Err(PublishError::Exhausted {
            attempts: retries,
            last: last_error.map(|e| e.to_string()).unwrap_or_default(),
        })
    }

    /// One exchange on a selected connection, with the status mapped to a result.
    async fn push(&self, conn: &Connection, request: PushRequest) -> Result<(), PublishError> {
        let response = conn.transport().send(request).await.map_err(|e| {
            warn!(conn = conn.id(), timeout_secs = conn.timeout().as_secs(), error = %e, "could not send metrics to pushgateway");
            e
        })?;

        if response.status.is_success() {
            return Ok(());
        }
        let body = String::from_utf8_lossy(&response.body).into_owned();
        warn!(conn = conn.id(), status = %response.status, %body, "unexpected status after pushing metrics");
        Err(PublishError::Status {
            status: response.status.as_u16(),
            body,
        })
    }
}
