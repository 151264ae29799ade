use std::time::{Duration, Instant};
use tower_decorate_core::events::WrapperEvent;

/// Events emitted by the timing wrapper.
#[derive(Debug, Clone)]
pub enum TimerEvent {
    /// The operation returned a result.
    Success {
        operation_name: String,
        timestamp: Instant,
        duration: Duration,
    },
    /// The operation returned an error.
    Failure {
        operation_name: String,
        timestamp: Instant,
        duration: Duration,
    },
}

impl TimerEvent {
    /// Measured wall-clock time of the invocation.
    pub fn duration(&self) -> Duration {
        match self {
            TimerEvent::Success { duration, .. } | TimerEvent::Failure { duration, .. } => {
                *duration
            }
        }
    }
}

impl WrapperEvent for TimerEvent {
    fn operation_name(&self) -> &str {
        match self {
            TimerEvent::Success { operation_name, .. }
            | TimerEvent::Failure { operation_name, .. } => operation_name,
        }
    }
}
