mod constants;
pub use constants::{CONTENT_TYPE_GOB, CONTENT_TYPE_JSON, DEFAULT_JOB, TAG_PLUGIN_RUNNING_ON, TAG_UNIT};

mod labels;
pub use labels::Labels;

mod namespace;
pub use namespace::NamespaceElement;

mod value;
pub use value::MetricValue;

mod record;
pub use record::MetricRecord;

/// Free-form tags attached to a metric record.
///
/// Ordering carries no meaning; a sorted map keeps iteration deterministic.
pub type Tags = std::collections::BTreeMap<String, String>;
