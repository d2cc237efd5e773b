//! In-memory object store for tests

use crate::error::{PipelineError, Result};
use crate::storage::{ObjectStore, StoredObject};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Map-backed object store.
///
/// `set_unavailable(true)` makes every fetch fail with a 503-shaped error, for
/// exercising the consumer's failure propagation.
#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
    unavailable: Mutex<bool>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, bucket: &str, path: &str, content: impl Into<Vec<u8>>) {
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), path.to_string()), content.into());
    }

    /// Simulate a store outage.
    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.lock().unwrap() = unavailable;
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn fetch(&self, bucket: &str, path: &str) -> Result<StoredObject> {
        if *self.unavailable.lock().unwrap() {
            return Err(PipelineError::HttpStatusError {
                url: format!("mem://{bucket}/{path}"),
                status: 503,
            });
        }

        let objects = self.objects.lock().unwrap();
        match objects.get(&(bucket.to_string(), path.to_string())) {
            Some(content) => Ok(StoredObject {
                bucket: bucket.to_string(),
                path: path.to_string(),
                content: content.clone(),
            }),
            None => Err(PipelineError::ObjectNotFound {
                bucket: bucket.to_string(),
                path: path.to_string(),
            }),
        }
    }
}
