use std::fmt::{self, Write};

use pgw_model::{Labels, MetricRecord};

use super::transform;

/// Content type of a text exposition body.
pub const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// A transformed metric: sanitized name, label set and rendered value.
///
/// Displays as one exposition line, `name{k1="v1",k2="v2"} value`, without a trailing newline.
/// Label values are quoted as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub name: String,
    pub labels: Labels,
    pub value: String,
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        f.write_char('{')?;
        for (i, (k, v)) in self.labels.iter().enumerate() {
            if i > 0 {
                f.write_char(',')?;
            }
            write!(f, "{k}=\"{v}\"")?;
        }
        write!(f, "}} {}", self.value)
    }
}

/// Render a batch of records into one push body.
///
/// One newline-terminated line per record, in input order.
pub fn render_batch(records: &[MetricRecord]) -> String {
    let mut out = String::with_capacity(records.len() * 64);
    for record in records {
        // Writing into a String cannot fail.
        let _ = writeln!(out, "{}", transform(record));
    }
    out
}
