//! Inbound batch decoding.
//!
//! The host delivers a batch as an opaque byte buffer tagged with a content type.
//! Only the JSON framing is understood here; GOB framing is recognised and rejected.
use crate::{
    CONTENT_TYPE_GOB, CONTENT_TYPE_JSON, MetricRecord,
    error::{ModelError, ModelResult},
};

/// Decode an inbound batch of metric records.
///
/// # Errors
/// - [`ModelError::Decode`] if the buffer is not a valid batch for its content type.
/// - [`ModelError::UnsupportedContentType`] for GOB framing or an unknown content type.
pub fn decode_batch(content_type: &str, content: &[u8]) -> ModelResult<Vec<MetricRecord>> {
    match content_type.trim().to_ascii_lowercase().as_str() {
        CONTENT_TYPE_JSON | "application/json" => serde_json::from_slice(content)
            .map_err(|e| ModelError::Decode(format!("invalid json batch: {e}"))),
        CONTENT_TYPE_GOB => Err(ModelError::UnsupportedContentType(format!(
            "{CONTENT_TYPE_GOB} (gob framing is not supported)"
        ))),
        other => Err(ModelError::UnsupportedContentType(other.to_string())),
    }
}
