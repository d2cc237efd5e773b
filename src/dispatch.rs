//! Dispatch adapter: typed consumer outcomes → hosting-runtime semantics
//!
//! The consumer returns a plain `Result`; this module translates it into the
//! acknowledge/redeliver/drop decision the hosting runtime reports back to
//! the queue, keeping retry signaling out of the error type's control flow.

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};

/// Success body returned to the queue on a completed attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchResponse {
    pub status: String,
    pub message: String,
}

impl DispatchResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
        }
    }
}

/// What the hosting runtime should tell the queue about this attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Attempt succeeded; the queue discards the task.
    Ack,
    /// Transient failure; the queue redelivers per the registered policy.
    Redeliver,
    /// Permanent failure; redelivery cannot succeed, discard the task.
    Drop,
}

impl Disposition {
    /// Classify one attempt's result.
    pub fn of(result: &Result<DispatchResponse>) -> Self {
        match result {
            Ok(_) => Disposition::Ack,
            Err(e) if e.is_retryable() => Disposition::Redeliver,
            Err(_) => Disposition::Drop,
        }
    }

    /// Process exit code for single-invocation harnesses.
    ///
    /// 75 is EX_TEMPFAIL, the conventional "transient failure, try again"
    /// code; harnesses treat anything else nonzero as permanent.
    pub fn exit_code(self) -> i32 {
        match self {
            Disposition::Ack => 0,
            Disposition::Redeliver => 75,
            Disposition::Drop => 1,
        }
    }
}
