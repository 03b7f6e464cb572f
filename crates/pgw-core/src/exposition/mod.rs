//! Metric record to Prometheus text exposition.
//!
//! [`transform`] maps a record to a sanitized [`Sample`], whose `Display` is one exposition line.
//! [`render_batch`] produces a full push body.
mod format;
pub use format::{EXPOSITION_CONTENT_TYPE, Sample, render_batch};

mod sanitize;
pub use sanitize::{sanitize_label_name, sanitize_metric_name};

mod transform;
pub use transform::transform;
