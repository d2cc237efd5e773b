//! HTTP client for the managed queue's create-task endpoint

use crate::auth::TokenProvider;
use crate::error::{PipelineError, Result};
use crate::queue::{EnqueuedTask, NewTask, TaskQueue};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;
use url::Url;

const DEFAULT_ENDPOINT: &str = "https://cloudtasks.googleapis.com/v2";

/// Task queue client speaking the managed service's REST API.
///
/// Submits one create-task call per enqueue and propagates every failure;
/// the queue service owns scheduling, retry timing, and dead-lettering.
pub struct HttpTaskQueue {
    client: Client,
    endpoint: Url,
    token: Option<Arc<dyn TokenProvider>>,
}

impl HttpTaskQueue {
    /// Client against the production endpoint, unauthenticated.
    pub fn new() -> Result<Self> {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Client against a custom endpoint (emulator, test server).
    pub fn with_endpoint(endpoint: &str) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            endpoint: Url::parse(endpoint)?,
            token: None,
        })
    }

    /// Attach a token provider for authenticated queue API calls.
    pub fn with_token_provider(mut self, token: Arc<dyn TokenProvider>) -> Self {
        self.token = Some(token);
        self
    }

    fn create_task_url(&self, queue_path: &str) -> String {
        let base = self.endpoint.as_str().trim_end_matches('/');
        format!("{base}/{queue_path}/tasks")
    }
}

#[async_trait]
impl TaskQueue for HttpTaskQueue {
    async fn enqueue(&self, task: NewTask) -> Result<EnqueuedTask> {
        let queue_path = task.queue.path();

        let mut http_request = json!({
            "httpMethod": "POST",
            "url": task.target_url,
            "headers": { "Content-type": "application/json" },
            "body": task.descriptor,
        });

        if let Some(oidc) = &task.oidc {
            http_request["oidcToken"] = json!({
                "serviceAccountEmail": oidc.service_account,
                "audience": oidc.audience,
            });
        }

        let mut body = json!({ "task": { "httpRequest": http_request } });
        if let Some(key) = &task.idempotency_key {
            body["task"]["name"] = json!(format!("{queue_path}/tasks/{key}"));
        }

        let mut request = self.client.post(self.create_task_url(&queue_path)).json(&body);
        if let Some(provider) = &self.token {
            let token = provider.access_token().await?;
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PipelineError::EnqueueTransport {
                queue: queue_path.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::QueueApi {
                queue: queue_path,
                status: status.as_u16(),
            });
        }

        // The service echoes the task resource; fall back to the requested
        // name if the response body is not what we expect.
        let name = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|v| v.get("name").and_then(|n| n.as_str()).map(String::from))
            .unwrap_or_else(|| match &task.idempotency_key {
                Some(key) => format!("{}/tasks/{key}", task.queue.path()),
                None => format!("{}/tasks", task.queue.path()),
            });

        debug!("Created task: {}", name);

        Ok(EnqueuedTask {
            name,
            enqueued_at: Utc::now(),
        })
    }
}
