use crate::error::SinkError;
use std::time::Instant;
use tower_decorate_core::events::WrapperEvent;

/// Events emitted by the failure notifier.
#[derive(Debug, Clone)]
pub enum NotifierEvent {
    /// The report for a failed call was delivered.
    NotificationSent {
        operation_name: String,
        timestamp: Instant,
        recipient: String,
    },
    /// The report for a failed call could not be delivered.
    NotificationFailed {
        operation_name: String,
        timestamp: Instant,
        error: SinkError,
    },
}

impl WrapperEvent for NotifierEvent {
    fn operation_name(&self) -> &str {
        match self {
            NotifierEvent::NotificationSent { operation_name, .. }
            | NotifierEvent::NotificationFailed { operation_name, .. } => operation_name,
        }
    }
}
