use std::time::Instant;
use tower_decorate_core::events::WrapperEvent;

/// Events emitted by the call counter.
#[derive(Debug, Clone)]
pub enum CallCounterEvent {
    /// A counted call returned successfully.
    Counted {
        operation_name: String,
        timestamp: Instant,
        /// The count assigned to this call when it started.
        count: u64,
    },
}

impl WrapperEvent for CallCounterEvent {
    fn operation_name(&self) -> &str {
        match self {
            CallCounterEvent::Counted { operation_name, .. } => operation_name,
        }
    }
}
