//! Pipeline configuration
//!
//! One explicit configuration struct populated at process start and passed to
//! both pipeline stages. No ambient globals, no per-call env lookups.

use crate::error::{PipelineError, Result};
use crate::queue::QueuePath;
use crate::worker::ConsumerConfig;

/// Configuration shared by the upload notifier and the task consumer.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Cloud project identifier
    pub project_id: String,

    /// Deployment region for the queue and the consumer endpoint
    pub location: String,

    /// Storage bucket the notifier watches
    pub bucket: String,

    /// Consumer registration: target queue and retry policy declaration
    pub consumer: ConsumerConfig,

    /// Service account used for authenticated dispatch. `None` disables the
    /// identity-token block on enqueued tasks.
    pub service_account: Option<String>,

    /// Explicit consumer invocation URL; derived from project/location when
    /// unset.
    pub consumer_url: Option<String>,
}

impl PipelineConfig {
    /// Create a config builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Populate from environment variables (loaded once at startup).
    ///
    /// `GCP_PROJECT` is required. `PIPELINE_LOCATION`, `PIPELINE_QUEUE`,
    /// `PIPELINE_BUCKET`, `PIPELINE_MAX_ATTEMPTS`, `PIPELINE_MIN_BACKOFF_SECS`,
    /// `PIPELINE_SERVICE_ACCOUNT`, and `PIPELINE_CONSUMER_URL` override the
    /// defaults.
    pub fn from_env() -> Result<Self> {
        let project_id = std::env::var("GCP_PROJECT")
            .map_err(|_| PipelineError::ConfigError("GCP_PROJECT not set".to_string()))?;

        let mut builder = Self::builder().project_id(&project_id);

        if let Ok(location) = std::env::var("PIPELINE_LOCATION") {
            builder = builder.location(&location);
        }
        if let Ok(queue) = std::env::var("PIPELINE_QUEUE") {
            builder = builder.queue_name(&queue);
        }
        if let Ok(bucket) = std::env::var("PIPELINE_BUCKET") {
            builder = builder.bucket(&bucket);
        }
        if let Ok(raw) = std::env::var("PIPELINE_MAX_ATTEMPTS") {
            let max_attempts = raw.parse().map_err(|_| {
                PipelineError::ConfigError(format!("PIPELINE_MAX_ATTEMPTS is not a number: {raw}"))
            })?;
            builder = builder.max_attempts(max_attempts);
        }
        if let Ok(raw) = std::env::var("PIPELINE_MIN_BACKOFF_SECS") {
            let secs = raw.parse().map_err(|_| {
                PipelineError::ConfigError(format!(
                    "PIPELINE_MIN_BACKOFF_SECS is not a number: {raw}"
                ))
            })?;
            builder = builder.min_backoff_secs(secs);
        }

        // Authenticated dispatch defaults to the project's App Engine service
        // account, matching the queue service's own default identity.
        let service_account = std::env::var("PIPELINE_SERVICE_ACCOUNT")
            .unwrap_or_else(|_| format!("{project_id}@appspot.gserviceaccount.com"));
        builder = builder.service_account(&service_account);

        if let Ok(url) = std::env::var("PIPELINE_CONSUMER_URL") {
            builder = builder.consumer_url(&url);
        }

        Ok(builder.build())
    }

    /// Fully qualified path of the queue the consumer is registered on.
    pub fn queue_path(&self) -> QueuePath {
        QueuePath::new(&self.project_id, &self.location, &self.consumer.queue_name)
    }

    /// Invocation URL the queue dispatches tasks to.
    pub fn consumer_url(&self) -> String {
        match &self.consumer_url {
            Some(url) => url.clone(),
            None => format!(
                "https://{}-{}.cloudfunctions.net/process_document_task",
                self.location, self.project_id
            ),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            location: "us-central1".to_string(),
            bucket: String::new(),
            consumer: ConsumerConfig::default(),
            service_account: None,
            consumer_url: None,
        }
    }
}

/// Builder for PipelineConfig
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    /// Set the project identifier
    pub fn project_id(mut self, project_id: &str) -> Self {
        self.config.project_id = project_id.to_string();
        self
    }

    /// Set the deployment region
    pub fn location(mut self, location: &str) -> Self {
        self.config.location = location.to_string();
        self
    }

    /// Set the queue name the consumer registers on
    pub fn queue_name(mut self, queue_name: &str) -> Self {
        self.config.consumer.queue_name = queue_name.to_string();
        self
    }

    /// Set the watched storage bucket
    pub fn bucket(mut self, bucket: &str) -> Self {
        self.config.bucket = bucket.to_string();
        self
    }

    /// Set the retry ceiling declared at consumer registration
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.config.consumer.retry.max_attempts = max_attempts;
        self
    }

    /// Set the minimum backoff declared at consumer registration
    pub fn min_backoff_secs(mut self, secs: u64) -> Self {
        self.config.consumer.retry.min_backoff = std::time::Duration::from_secs(secs);
        self
    }

    /// Set the service account for authenticated dispatch
    pub fn service_account(mut self, service_account: &str) -> Self {
        self.config.service_account = Some(service_account.to_string());
        self
    }

    /// Override the derived consumer invocation URL
    pub fn consumer_url(mut self, url: &str) -> Self {
        self.config.consumer_url = Some(url.to_string());
        self
    }

    /// Build the config
    pub fn build(self) -> PipelineConfig {
        self.config
    }
}

impl Default for PipelineConfigBuilder {
    fn default() -> Self {
        Self {
            config: PipelineConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore] // Mutates process-wide env vars; run single-threaded
    fn from_env_requires_a_project_id() {
        std::env::remove_var("GCP_PROJECT");
        let err = PipelineConfig::from_env().unwrap_err();
        assert!(matches!(err, PipelineError::ConfigError(_)));
    }

    #[test]
    fn derives_consumer_url_from_project_and_location() {
        let config = PipelineConfig::builder()
            .project_id("my-project")
            .location("us-central1")
            .build();
        assert_eq!(
            config.consumer_url(),
            "https://us-central1-my-project.cloudfunctions.net/process_document_task"
        );
    }

    #[test]
    fn explicit_consumer_url_wins() {
        let config = PipelineConfig::builder()
            .project_id("my-project")
            .consumer_url("https://worker.example.com/tasks")
            .build();
        assert_eq!(config.consumer_url(), "https://worker.example.com/tasks");
    }

    #[test]
    fn queue_path_uses_consumer_registration() {
        let config = PipelineConfig::builder()
            .project_id("my-project")
            .location("europe-west1")
            .queue_name("document-processing-queue")
            .build();
        assert_eq!(
            config.queue_path().to_string(),
            "projects/my-project/locations/europe-west1/queues/document-processing-queue"
        );
    }
}
