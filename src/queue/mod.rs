//! Task queue port
//!
//! The durable queue is an external managed service; this module defines the
//! enqueue contract the notifier talks to, plus:
//! - HttpTaskQueue: REST client for the managed queue's create-task endpoint
//! - InMemoryTaskQueue: recording implementation for tests

pub mod http;
pub mod memory;

pub use http::HttpTaskQueue;
pub use memory::InMemoryTaskQueue;

use crate::descriptor::TaskDescriptor;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;
use std::time::Duration;

/// Fully qualified queue identifier: `{projectId, location, queueName}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuePath {
    pub project_id: String,
    pub location: String,
    pub queue_name: String,
}

impl QueuePath {
    pub fn new(
        project_id: impl Into<String>,
        location: impl Into<String>,
        queue_name: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            location: location.into(),
            queue_name: queue_name.into(),
        }
    }

    /// Resource path in the queue service's API.
    pub fn path(&self) -> String {
        format!(
            "projects/{}/locations/{}/queues/{}",
            self.project_id, self.location, self.queue_name
        )
    }
}

impl fmt::Display for QueuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Retry policy declared per-consumer at registration time.
///
/// The external queue owns the actual retry timing; these values are only
/// forwarded to it, never computed against locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Attempt ceiling before the queue dead-letters the task
    pub max_attempts: u32,

    /// Minimum interval between redelivery attempts
    pub min_backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            min_backoff: Duration::from_secs(60),
        }
    }
}

/// Identity-token request attached to a task for authenticated dispatch.
///
/// The queue service mints the token at dispatch time; the notifier only
/// names the identity and the audience.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OidcToken {
    pub service_account: String,
    pub audience: String,
}

/// A task submitted to the queue: descriptor body plus dispatch target.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub queue: QueuePath,
    pub target_url: String,
    pub descriptor: TaskDescriptor,
    /// Deterministic task name; lets a deduplicating queue collapse repeats.
    pub idempotency_key: Option<String>,
    pub oidc: Option<OidcToken>,
}

/// Receipt returned by the queue after a successful enqueue.
#[derive(Debug, Clone)]
pub struct EnqueuedTask {
    /// Queue-assigned task name
    pub name: String,
    pub enqueued_at: DateTime<Utc>,
}

/// Enqueue contract between the upload notifier and the external queue.
///
/// Implementations submit exactly one create-task call per invocation and
/// surface every failure to the caller; retry of the *notifier* belongs to
/// the trigger runtime, not to this trait.
#[async_trait]
pub trait TaskQueue: Send + Sync {
    async fn enqueue(&self, task: NewTask) -> Result<EnqueuedTask>;
}
