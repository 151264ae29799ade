//! Error types for the failure notifier.

/// Errors reported by a [`NotificationSink`](crate::NotificationSink).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SinkError {
    /// The transport could not deliver the message.
    #[error("notification transport failed: {0}")]
    Transport(String),
    /// The transport refused the message or the credential.
    #[error("notification rejected: {reason}")]
    Rejected {
        /// Reason given by the transport.
        reason: String,
    },
}

/// Errors returned by a service wrapped with the failure notifier.
///
/// The wrapped operation's failure is always available: directly in
/// [`Operation`](NotifierError::Operation) when the report was delivered,
/// and in `original` when delivering the report failed too.
#[derive(Debug, thiserror::Error)]
pub enum NotifierError<E> {
    /// The operation failed and the failure was reported.
    #[error(transparent)]
    Operation(E),
    /// The operation failed and reporting that failure failed as well.
    #[error("failure notification could not be sent: {source}")]
    Sink {
        /// Why the sink could not deliver the report.
        source: SinkError,
        /// The operation's failure.
        original: E,
    },
}

impl<E> NotifierError<E> {
    /// Returns the operation's failure, discarding any sink failure.
    pub fn into_original(self) -> E {
        match self {
            NotifierError::Operation(e) => e,
            NotifierError::Sink { original, .. } => original,
        }
    }

    /// Returns the operation's failure.
    pub fn original(&self) -> &E {
        match self {
            NotifierError::Operation(e) => e,
            NotifierError::Sink { original, .. } => original,
        }
    }

    /// Returns the sink failure, if the report could not be delivered.
    pub fn sink_error(&self) -> Option<&SinkError> {
        match self {
            NotifierError::Operation(_) => None,
            NotifierError::Sink { source, .. } => Some(source),
        }
    }

    /// Returns `true` if the report could not be delivered.
    pub fn is_sink_failure(&self) -> bool {
        matches!(self, NotifierError::Sink { .. })
    }
}
