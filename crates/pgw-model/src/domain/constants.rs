//! Common model-level constants.
//!
//! Well-known tag keys, defaults and content types shared by the publisher crates.

/// Tag set by the host on every metric, naming the machine the producer runs on.
///
/// The transformer never emits it verbatim: its value is exposed as `source` and `host` labels instead.
pub const TAG_PLUGIN_RUNNING_ON: &str = "plugin_running_on";

/// Tag (and label) key carrying the metric unit.
pub const TAG_UNIT: &str = "unit";

/// Job name used in the push URL when none is configured.
pub const DEFAULT_JOB: &str = "unused";

/// Content type of a JSON encoded metric batch.
pub const CONTENT_TYPE_JSON: &str = "snap.json";

/// Content type of a GOB encoded metric batch.
pub const CONTENT_TYPE_GOB: &str = "snap.gob";
