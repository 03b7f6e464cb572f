pub mod error;
pub mod exposition;
pub mod map;
pub mod metrics;
pub mod pool;
pub mod publisher;
pub mod transport;
pub mod url;

pub use error::PublishError;
pub use exposition::{
    EXPOSITION_CONTENT_TYPE, Sample, render_batch, sanitize_label_name, sanitize_metric_name,
    transform,
};
pub use metrics::{
    AttemptOutcome, MetricsBackend, MetricsHandle, NoOpMetrics, PublishOutcome, noop_metrics,
};
pub use pool::{Connection, ConnectionPool, PoolConfig, PoolKey, Reaper};
pub use publisher::Publisher;
pub use transport::{Connector, HyperConnector, PushRequest, PushResponse, Transport, TransportHandle};
pub use url::build_push_url;

pub mod prelude {
    pub use crate::error::PublishError;
    pub use crate::pool::{ConnectionPool, PoolConfig};
    pub use crate::publisher::Publisher;
    pub use crate::transport::HyperConnector;
}
