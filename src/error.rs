//! Error types for document-pipeline

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Missing or empty '{field}' in task payload")]
    InvalidPayload { field: &'static str },

    #[error("Failed to reach task queue: {queue}")]
    EnqueueTransport {
        queue: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Task queue '{queue}' returned status {status}")]
    QueueApi { queue: String, status: u16 },

    #[error("Failed to fetch object: {url}")]
    FetchError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status} fetching object: {url}")]
    HttpStatusError { url: String, status: u16 },

    #[error("Object not found: gs://{bucket}/{path}")]
    ObjectNotFound { bucket: String, path: String },

    #[error("Failed to obtain access token")]
    TokenRequest {
        #[source]
        source: reqwest::Error,
    },

    #[error("Token endpoint returned status {status}")]
    TokenStatus { status: u16 },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Document processing failed: {0}")]
    ProcessingError(String),
}

impl PipelineError {
    /// Whether a failed delivery attempt is worth redelivering.
    ///
    /// Validation, configuration, and payload-decoding failures cannot succeed
    /// on a later attempt; everything else is treated as transient.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            PipelineError::InvalidPayload { .. }
                | PipelineError::ConfigError(_)
                | PipelineError::SerializationError(_)
                | PipelineError::InvalidUrl(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_not_retryable() {
        let err = PipelineError::InvalidPayload { field: "filePath" };
        assert!(!err.is_retryable());

        let err = PipelineError::ConfigError("GCP_PROJECT not set".to_string());
        assert!(!err.is_retryable());
    }

    #[test]
    fn infrastructure_errors_are_retryable() {
        let err = PipelineError::QueueApi {
            queue: "projects/p/locations/l/queues/q".to_string(),
            status: 503,
        };
        assert!(err.is_retryable());

        let err = PipelineError::ObjectNotFound {
            bucket: "my-bucket".to_string(),
            path: "docs/report.pdf".to_string(),
        };
        assert!(err.is_retryable());
    }
}
