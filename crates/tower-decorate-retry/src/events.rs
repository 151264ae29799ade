use std::time::{Duration, Instant};
use tower_decorate_core::events::WrapperEvent;

/// Events emitted by the retry wrapper.
#[derive(Debug, Clone)]
pub enum RetryEvent {
    /// An attempt failed with a retryable error and another one will follow.
    Retry {
        operation_name: String,
        timestamp: Instant,
        /// The attempt that just failed (1-based).
        attempt: usize,
        delay: Duration,
    },
    /// The operation succeeded (either on first try or after retries).
    Success {
        operation_name: String,
        timestamp: Instant,
        attempts: usize,
    },
    /// The operation failed after exhausting all attempts.
    Error {
        operation_name: String,
        timestamp: Instant,
        attempts: usize,
    },
    /// An error did not match the retry filter and was returned immediately.
    IgnoredError {
        operation_name: String,
        timestamp: Instant,
        attempts: usize,
    },
}

impl WrapperEvent for RetryEvent {
    fn operation_name(&self) -> &str {
        match self {
            RetryEvent::Retry { operation_name, .. }
            | RetryEvent::Success { operation_name, .. }
            | RetryEvent::Error { operation_name, .. }
            | RetryEvent::IgnoredError { operation_name, .. } => operation_name,
        }
    }
}
