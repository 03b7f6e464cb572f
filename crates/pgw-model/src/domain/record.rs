use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::{MetricValue, NamespaceElement, Tags};

/// A single metric observation handed to the publisher.
///
/// Records are immutable once received: the publisher only reads them while
/// building the exposition body of one push.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricRecord {
    /// Ordered namespace path, static and dynamic elements mixed.
    pub namespace: Vec<NamespaceElement>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Tags,
    /// Unit of the observed value.
    #[serde(default)]
    pub unit: String,
    /// Observed value.
    pub data: MetricValue,
    /// Wall-clock time of the observation.
    #[serde(with = "time::serde::rfc3339", default = "time::OffsetDateTime::now_utc")]
    pub timestamp: OffsetDateTime,
}

impl MetricRecord {
    /// Create a record with no tags, an empty unit and the current time.
    pub fn new<N, V>(namespace: N, data: V) -> Self
    where
        N: IntoIterator,
        N::Item: Into<NamespaceElement>,
        V: Into<MetricValue>,
    {
        Self {
            namespace: namespace.into_iter().map(Into::into).collect(),
            tags: Tags::new(),
            unit: String::new(),
            data: data.into(),
            timestamp: OffsetDateTime::now_utc(),
        }
    }

    /// Set the unit and return the updated record.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Add a tag and return the updated record.
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Set the observation time and return the updated record.
    pub fn with_timestamp(mut self, timestamp: OffsetDateTime) -> Self {
        self.timestamp = timestamp;
        self
    }
}
