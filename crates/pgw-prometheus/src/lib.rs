//! Prometheus self-metrics for the pushgateway publisher.
//!
//! [`PrometheusMetrics`] implements [`pgw_core::MetricsBackend`] and keeps its series in a
//! private [`Registry`], so the publisher's own health never mixes with the batches it pushes.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use pgw_core::{ConnectionPool, HyperConnector, PoolConfig, Publisher};
//! use pgw_prometheus::PrometheusMetrics;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metrics = Arc::new(PrometheusMetrics::new()?);
//! let pool = ConnectionPool::new(Arc::new(HyperConnector::new()), PoolConfig::default())
//!     .with_metrics(metrics.clone());
//! let publisher = Publisher::new(Arc::new(pool)).with_metrics(metrics.clone());
//! # let _ = publisher;
//!
//! let text = metrics.encode_text()?;
//! # let _ = text;
//! # Ok(())
//! # }
//! ```
//!
//! ## Metrics
//! - `pgw_push_attempts_total{job, outcome}`: Counter
//! - `pgw_publishes_total{job, outcome}`: Counter
//! - `pgw_publish_duration_seconds{job}`: Histogram
//! - `pgw_pool_evictions_total`: Counter

mod backend;
pub use backend::PrometheusMetrics;

pub use prometheus::{Encoder, Registry, TextEncoder};
