//! Document Pipeline - A Rust service for dispatching and processing document upload tasks
//!
//! Two stateless stages composed through an external durable queue: the
//! upload notifier reacts to finalized-object notifications and enqueues a
//! task descriptor; the task consumer is later invoked with that descriptor,
//! fetches the object, and runs the processing handler.
//!
//! The queue and the object store are reached through ports
//! ([`queue::TaskQueue`], [`storage::ObjectStore`]) with HTTP-backed
//! implementations for deployment and in-memory implementations for tests.

pub mod auth;
pub mod config;
pub mod descriptor;
pub mod dispatch;
pub mod error;
pub mod notifier;
pub mod queue;
pub mod storage;
pub mod worker;

pub use config::PipelineConfig;
pub use descriptor::TaskDescriptor;
pub use dispatch::{DispatchResponse, Disposition};
pub use error::{PipelineError, Result};
pub use notifier::{FinalizeEvent, NotifyOutcome, UploadNotifier};
pub use queue::{HttpTaskQueue, InMemoryTaskQueue, QueuePath, RetryConfig, TaskQueue};
pub use storage::{HttpObjectStore, InMemoryObjectStore, ObjectStore, StoredObject};
pub use worker::{ConsumerConfig, DocumentHandler, TaskConsumer, TextPreviewHandler};
