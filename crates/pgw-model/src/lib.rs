mod domain;
pub use domain::{
    CONTENT_TYPE_GOB, CONTENT_TYPE_JSON, DEFAULT_JOB, Labels, MetricRecord, MetricValue,
    NamespaceElement, TAG_PLUGIN_RUNNING_ON, TAG_UNIT, Tags,
};

mod error;
pub use error::{ModelError, ModelResult};

mod config;
pub use config::{ConfigMap, ConfigValue, PublishConfig, PublisherLogLevel};

mod strategy;
pub use strategy::{BackoffStrategy, JitterStrategy};

mod decode;
pub use decode::decode_batch;
