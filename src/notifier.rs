//! Upload notifier: turns finalize notifications into queued tasks

use crate::config::PipelineConfig;
use crate::descriptor::{idempotency_key, TaskDescriptor};
use crate::error::Result;
use crate::queue::{EnqueuedTask, NewTask, OidcToken, TaskQueue};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

/// Notification that an object is fully written to the store.
///
/// `name` may be empty (some trigger sources emit finalize events for
/// placeholder entries); `generation` is absent on stores that do not
/// version objects.
#[derive(Debug, Clone, Deserialize)]
pub struct FinalizeEvent {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub bucket: String,
    #[serde(default)]
    pub generation: Option<u64>,
}

/// What a notifier invocation did.
#[derive(Debug)]
pub enum NotifyOutcome {
    /// Exactly one task was submitted to the queue.
    Enqueued(EnqueuedTask),
    /// The notification carried no object name; nothing was enqueued.
    Skipped,
}

/// Producer stage: one finalize notification in, at most one enqueue out.
///
/// Stateless; any number of invocations may run concurrently. Failures
/// propagate to the caller so the trigger runtime can apply its own retry.
pub struct UploadNotifier {
    config: PipelineConfig,
    queue: Arc<dyn TaskQueue>,
}

impl UploadNotifier {
    pub fn new(config: PipelineConfig, queue: Arc<dyn TaskQueue>) -> Self {
        Self { config, queue }
    }

    /// Handle one finalize notification.
    pub async fn handle(&self, event: &FinalizeEvent) -> Result<NotifyOutcome> {
        if event.name.is_empty() {
            info!("No file name found in the event, skipping");
            return Ok(NotifyOutcome::Skipped);
        }

        info!(
            "New document uploaded to bucket '{}': {}",
            event.bucket, event.name
        );

        let descriptor = TaskDescriptor::new(&event.name, &event.bucket);
        let target_url = self.config.consumer_url();

        let oidc = self
            .config
            .service_account
            .as_ref()
            .map(|service_account| OidcToken {
                service_account: service_account.clone(),
                audience: target_url.clone(),
            });

        let task = NewTask {
            queue: self.config.queue_path(),
            target_url,
            descriptor,
            idempotency_key: Some(idempotency_key(
                &event.bucket,
                &event.name,
                event.generation,
            )),
            oidc,
        };

        let enqueued = self.queue.enqueue(task).await?;
        info!("Successfully enqueued task: {}", enqueued.name);

        Ok(NotifyOutcome::Enqueued(enqueued))
    }
}
