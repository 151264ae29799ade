use std::time::Instant;
use tower_decorate_core::events::WrapperEvent;

/// Events emitted by the memoizing wrapper.
#[derive(Debug, Clone)]
pub enum MemoEvent {
    /// A stored result was replayed without invoking the operation.
    Hit {
        operation_name: String,
        timestamp: Instant,
    },
    /// No result was stored; the operation is invoked.
    Miss {
        operation_name: String,
        timestamp: Instant,
    },
}

impl WrapperEvent for MemoEvent {
    fn operation_name(&self) -> &str {
        match self {
            MemoEvent::Hit { operation_name, .. } | MemoEvent::Miss { operation_name, .. } => {
                operation_name
            }
        }
    }
}
