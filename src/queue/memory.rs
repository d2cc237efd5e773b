//! In-memory task queue for tests

use crate::error::{PipelineError, Result};
use crate::queue::{EnqueuedTask, NewTask, TaskQueue};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;

/// Recording queue: accepts every task and keeps it for inspection.
///
/// `set_unavailable(true)` makes subsequent enqueues fail with a 503, for
/// exercising the notifier's error propagation.
#[derive(Default)]
pub struct InMemoryTaskQueue {
    tasks: Mutex<Vec<NewTask>>,
    unavailable: Mutex<bool>,
}

impl InMemoryTaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a queue outage.
    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.lock().unwrap() = unavailable;
    }

    /// Snapshot of everything enqueued so far.
    pub fn enqueued(&self) -> Vec<NewTask> {
        self.tasks.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TaskQueue for InMemoryTaskQueue {
    async fn enqueue(&self, task: NewTask) -> Result<EnqueuedTask> {
        if *self.unavailable.lock().unwrap() {
            return Err(PipelineError::QueueApi {
                queue: task.queue.path(),
                status: 503,
            });
        }

        let name = match &task.idempotency_key {
            Some(key) => format!("{}/tasks/{key}", task.queue.path()),
            None => format!("{}/tasks/{}", task.queue.path(), self.len()),
        };

        self.tasks.lock().unwrap().push(task);

        Ok(EnqueuedTask {
            name,
            enqueued_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::TaskDescriptor;
    use crate::queue::QueuePath;

    fn sample_task() -> NewTask {
        NewTask {
            queue: QueuePath::new("p", "l", "q"),
            target_url: "https://worker.example.com/tasks".to_string(),
            descriptor: TaskDescriptor::new("docs/report.pdf", "my-bucket"),
            idempotency_key: None,
            oidc: None,
        }
    }

    #[tokio::test]
    async fn records_enqueued_tasks() {
        let queue = InMemoryTaskQueue::new();
        queue.enqueue(sample_task()).await.unwrap();
        queue.enqueue(sample_task()).await.unwrap();

        assert_eq!(queue.len(), 2);
        assert_eq!(
            queue.enqueued()[0].descriptor.file_path(),
            "docs/report.pdf"
        );
    }

    #[tokio::test]
    async fn outage_fails_the_enqueue() {
        let queue = InMemoryTaskQueue::new();
        queue.set_unavailable(true);

        let err = queue.enqueue(sample_task()).await.unwrap_err();
        assert!(matches!(err, PipelineError::QueueApi { status: 503, .. }));
        assert!(queue.is_empty());
    }
}
