use pgw_model::{Labels, MetricRecord, TAG_PLUGIN_RUNNING_ON, TAG_UNIT};

use super::{Sample, sanitize_label_name, sanitize_metric_name};

const LABEL_SOURCE: &str = "source";
const LABEL_HOST: &str = "host";

/// Map a metric record into an exposition [`Sample`].
///
/// Rules, applied in order:
/// 1. Dynamic namespace elements leave the name and become `name="value"` labels.
/// 2. Remaining elements are sanitized to `[A-Za-z0-9:_]` and joined with `_`.
/// 3. A `unit` label is added from the record unit unless a `unit` tag exists.
/// 4. The running-on tag is exported as `source` and `host` labels, each only when the
///    tag set does not carry that key itself. Any other tag key is sanitized to `[A-Za-z0-9_]`.
/// 5. The value is rendered in its default textual form.
///
/// Later rules overwrite labels set by earlier ones.
pub fn transform(record: &MetricRecord) -> Sample {
    let mut labels = Labels::new();
    let mut segments = Vec::with_capacity(record.namespace.len());

    // Splitting in one pass keeps every static element exactly once, whatever the dynamic positions.
    for element in &record.namespace {
        match element.name() {
            Some(name) => {
                labels.insert(name, element.value());
            }
            None => segments.push(sanitize_metric_name(element.value())),
        }
    }

    if !record.tags.contains_key(TAG_UNIT) {
        labels.insert(TAG_UNIT, record.unit.as_str());
    }

    for (key, value) in &record.tags {
        if key == TAG_PLUGIN_RUNNING_ON {
            if !record.tags.contains_key(LABEL_SOURCE) {
                labels.insert(LABEL_SOURCE, value.as_str());
            }
            if !record.tags.contains_key(LABEL_HOST) {
                labels.insert(LABEL_HOST, value.as_str());
            }
        } else {
            labels.insert(sanitize_label_name(key), value.as_str());
        }
    }

    Sample {
        name: segments.join("_"),
        labels,
        value: record.data.to_string(),
    }
}
