//! Object store port
//!
//! The blob store is external; the consumer only needs to resolve an object
//! reference and fetch its full content. No streaming, no partial reads.

pub mod http;
pub mod memory;

pub use http::HttpObjectStore;
pub use memory::InMemoryObjectStore;

use crate::error::Result;
use async_trait::async_trait;

/// A fetched object: reference plus full content.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bucket: String,
    pub path: String,
    pub content: Vec<u8>,
}

impl StoredObject {
    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Fetch contract between the consumer and the external object store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn fetch(&self, bucket: &str, path: &str) -> Result<StoredObject>;
}
