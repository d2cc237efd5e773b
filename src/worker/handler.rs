//! Document processing extension point

use crate::error::Result;
use crate::storage::StoredObject;
use async_trait::async_trait;
use tracing::info;

/// Domain-specific processing applied to a fetched document.
///
/// Implementations run once per delivery attempt with no checkpointing; a
/// failed attempt restarts from scratch. Return an error to have the attempt
/// redelivered by the queue.
#[async_trait]
pub trait DocumentHandler: Send + Sync {
    async fn handle(&self, object: &StoredObject) -> Result<()>;
}

/// Default handler: log a short preview of the document content.
///
/// Stands in for real processing (text extraction, transcoding, indexing)
/// until a deployment supplies its own [`DocumentHandler`].
pub struct TextPreviewHandler {
    preview_chars: usize,
}

impl TextPreviewHandler {
    pub fn new() -> Self {
        Self { preview_chars: 200 }
    }

    pub fn with_limit(preview_chars: usize) -> Self {
        Self { preview_chars }
    }
}

impl Default for TextPreviewHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentHandler for TextPreviewHandler {
    async fn handle(&self, object: &StoredObject) -> Result<()> {
        let text = String::from_utf8_lossy(&object.content);
        let preview: String = text.chars().take(self.preview_chars).collect();
        info!(
            "Content of '{}' (first {} chars):\n{}",
            object.path,
            self.preview_chars,
            preview
        );
        Ok(())
    }
}
