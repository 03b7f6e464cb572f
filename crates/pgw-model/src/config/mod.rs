mod value;
pub use value::{ConfigMap, ConfigValue};

mod log_level;
pub use log_level::PublisherLogLevel;

mod publish;
pub use publish::PublishConfig;
