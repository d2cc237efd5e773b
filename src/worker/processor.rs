//! Task consumer: processes one dispatched task per invocation

use crate::descriptor::TaskDescriptor;
use crate::dispatch::DispatchResponse;
use crate::error::Result;
use crate::storage::ObjectStore;
use crate::worker::{ConsumerConfig, DocumentHandler};
use std::sync::Arc;
use tracing::info;

/// Consumer stage: validate the payload, fetch the object, run the handler.
///
/// Stateless across invocations. Every error is returned to the caller; the
/// dispatch adapter decides whether the queue should redeliver.
pub struct TaskConsumer {
    config: ConsumerConfig,
    store: Arc<dyn ObjectStore>,
    handler: Arc<dyn DocumentHandler>,
}

impl TaskConsumer {
    pub fn new(
        config: ConsumerConfig,
        store: Arc<dyn ObjectStore>,
        handler: Arc<dyn DocumentHandler>,
    ) -> Self {
        Self {
            config,
            store,
            handler,
        }
    }

    /// Registration values the hosting runtime declares to the queue.
    pub fn config(&self) -> &ConsumerConfig {
        &self.config
    }

    /// Handle one dispatched request body.
    ///
    /// Decodes and validates before touching the object store, so a malformed
    /// payload never costs a fetch.
    pub async fn process_payload(&self, body: &str) -> Result<DispatchResponse> {
        let descriptor = TaskDescriptor::from_json(body)?;
        descriptor.validate()?;
        self.process(&descriptor).await
    }

    /// Process a validated task descriptor.
    pub async fn process(&self, descriptor: &TaskDescriptor) -> Result<DispatchResponse> {
        info!(
            "Task received: Processing document '{}' from bucket '{}'",
            descriptor.file_path(),
            descriptor.bucket()
        );

        // Step 1-2: resolve the reference and fetch full content
        let object = self
            .store
            .fetch(descriptor.bucket(), descriptor.file_path())
            .await?;

        // Step 3: domain-specific processing
        self.handler.handle(&object).await?;

        info!("Successfully processed document: {}", descriptor.file_path());

        // Step 4: success summary
        Ok(DispatchResponse::success(format!(
            "Processed {}",
            descriptor.file_path()
        )))
    }
}
