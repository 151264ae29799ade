use std::time::{Duration, Instant};
use tower_decorate_core::events::WrapperEvent;

/// Events emitted by the rate limiter.
#[derive(Debug, Clone)]
pub enum RateLimiterEvent {
    /// A call was admitted, possibly after waiting for its slot.
    PermitAcquired {
        operation_name: String,
        timestamp: Instant,
        wait_duration: Duration,
    },
}

impl WrapperEvent for RateLimiterEvent {
    fn operation_name(&self) -> &str {
        match self {
            RateLimiterEvent::PermitAcquired { operation_name, .. } => operation_name,
        }
    }
}
