//! Worker module: the task consumer side of the pipeline
//!
//! This module provides:
//! - TaskConsumer: validates dispatched payloads and processes documents
//! - DocumentHandler: extension point for the actual processing logic
//! - ConsumerConfig: per-consumer registration (queue name, retry policy)

pub mod config;
pub mod handler;
pub mod processor;

pub use config::ConsumerConfig;
pub use handler::{DocumentHandler, TextPreviewHandler};
pub use processor::TaskConsumer;
