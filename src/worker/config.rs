//! Consumer registration configuration

use crate::queue::RetryConfig;

/// Values a consumer declares at registration time.
///
/// The queue name ties producer and consumer together; the retry policy is
/// forwarded to the external queue, which owns the actual scheduling.
#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    /// Queue this consumer is registered on
    pub queue_name: String,

    /// Retry ceiling and minimum backoff, declared rather than computed
    pub retry: RetryConfig,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            queue_name: "document-processing-queue".to_string(),
            retry: RetryConfig::default(),
        }
    }
}
