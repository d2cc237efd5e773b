//! Task descriptor: the payload handed from the upload notifier to the consumer

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// The work item exchanged between the two pipeline stages.
///
/// Serialized as `{"filePath": ..., "bucket": ...}`, the exact body the queue
/// delivers to the consumer. A descriptor is frozen once built; there are no
/// mutators.
///
/// Missing fields deserialize as empty strings so that a malformed dispatch
/// payload surfaces as a validation error rather than a decode error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDescriptor {
    #[serde(rename = "filePath", default)]
    file_path: String,
    #[serde(default)]
    bucket: String,
}

impl TaskDescriptor {
    pub fn new(file_path: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            bucket: bucket.into(),
        }
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Check that both fields are present and non-empty.
    pub fn validate(&self) -> Result<()> {
        if self.file_path.is_empty() {
            return Err(PipelineError::InvalidPayload { field: "filePath" });
        }
        if self.bucket.is_empty() {
            return Err(PipelineError::InvalidPayload { field: "bucket" });
        }
        Ok(())
    }

    /// Serialize to the wire body submitted to the queue.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from a dispatched body. Does not validate; call
    /// [`TaskDescriptor::validate`] before acting on the result.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Deterministic task name for deduplicating repeated finalize notifications.
///
/// Two notifier invocations for the same object generation produce the same
/// key, letting a deduplicating queue collapse them. A new generation (object
/// overwrite) produces a fresh key and therefore a fresh task.
pub fn idempotency_key(bucket: &str, file_path: &str, generation: Option<u64>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bucket.as_bytes());
    hasher.update(b"/");
    hasher.update(file_path.as_bytes());
    hasher.update(b"@");
    hasher.update(generation.unwrap_or(0).to_be_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_to_camel_case_wire_body() {
        let descriptor = TaskDescriptor::new("docs/report.pdf", "my-bucket");
        assert_eq!(
            descriptor.to_json().unwrap(),
            r#"{"filePath":"docs/report.pdf","bucket":"my-bucket"}"#
        );
    }

    #[test]
    fn round_trips_from_dispatched_body() {
        let descriptor =
            TaskDescriptor::from_json(r#"{"filePath":"docs/report.pdf","bucket":"my-bucket"}"#)
                .unwrap();
        assert_eq!(descriptor.file_path(), "docs/report.pdf");
        assert_eq!(descriptor.bucket(), "my-bucket");
        assert!(descriptor.validate().is_ok());
    }

    #[test]
    fn missing_fields_fail_validation_not_decoding() {
        let descriptor = TaskDescriptor::from_json(r#"{"bucket":"my-bucket"}"#).unwrap();
        assert!(matches!(
            descriptor.validate(),
            Err(PipelineError::InvalidPayload { field: "filePath" })
        ));

        let descriptor = TaskDescriptor::from_json(r#"{"filePath":"docs/report.pdf"}"#).unwrap();
        assert!(matches!(
            descriptor.validate(),
            Err(PipelineError::InvalidPayload { field: "bucket" })
        ));
    }

    #[test]
    fn empty_fields_fail_validation() {
        let descriptor = TaskDescriptor::new("", "my-bucket");
        assert!(descriptor.validate().is_err());
    }

    #[test]
    fn idempotency_key_is_deterministic() {
        let a = idempotency_key("my-bucket", "docs/report.pdf", Some(42));
        let b = idempotency_key("my-bucket", "docs/report.pdf", Some(42));
        assert_eq!(a, b);
    }

    #[test]
    fn idempotency_key_differs_across_generations() {
        let gen1 = idempotency_key("my-bucket", "docs/report.pdf", Some(1));
        let gen2 = idempotency_key("my-bucket", "docs/report.pdf", Some(2));
        let no_gen = idempotency_key("my-bucket", "docs/report.pdf", None);
        assert_ne!(gen1, gen2);
        assert_ne!(gen1, no_gen);
    }

    #[test]
    fn idempotency_key_differs_across_objects() {
        let a = idempotency_key("my-bucket", "docs/report.pdf", None);
        let b = idempotency_key("my-bucket", "docs/other.pdf", None);
        let c = idempotency_key("other-bucket", "docs/report.pdf", None);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }
}
