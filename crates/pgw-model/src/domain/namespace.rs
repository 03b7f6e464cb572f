use serde::{Deserialize, Serialize};

/// One element of a metric namespace.
///
/// A static element only has a `value`. A dynamic element also carries a `name`:
/// it stands for a templated path position (cpu id, disk name, ...) whose
/// value varies per instance and is exported as a label instead of being part of the metric name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceElement {
    value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl NamespaceElement {
    /// Create a static element.
    pub fn fixed(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            name: None,
        }
    }

    /// Create a dynamic element named `name` with runtime `value`.
    pub fn dynamic(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            name: Some(name.into()),
        }
    }

    /// Element value as seen in the namespace path.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Name of a dynamic element, `None` for static ones.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }
}

impl From<&str> for NamespaceElement {
    fn from(value: &str) -> Self {
        Self::fixed(value)
    }
}
