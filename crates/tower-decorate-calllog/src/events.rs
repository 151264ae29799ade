use std::time::Instant;
use tower_decorate_core::events::WrapperEvent;

/// Events emitted by the call logger.
#[derive(Debug, Clone)]
pub enum CallLogEvent {
    /// The operation is about to be invoked.
    Started {
        operation_name: String,
        timestamp: Instant,
        /// The request rendered with its `Debug` representation.
        arguments: String,
    },
    /// The operation returned successfully.
    Finished {
        operation_name: String,
        timestamp: Instant,
    },
}

impl WrapperEvent for CallLogEvent {
    fn operation_name(&self) -> &str {
        match self {
            CallLogEvent::Started { operation_name, .. }
            | CallLogEvent::Finished { operation_name, .. } => operation_name,
        }
    }
}
