//! Failure reports and the messages built from them.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error;
use std::fmt;
use std::time::SystemTime;

/// Description of one failed invocation.
///
/// Built fresh for every failure and never persisted.
#[derive(Debug, Clone)]
pub struct FailureReport {
    /// Type name of the error.
    pub kind: &'static str,
    /// The error's `Display` text.
    pub message: String,
    /// The error and its source chain, one per line, followed by a
    /// backtrace when backtraces are enabled.
    pub trace: String,
    /// Name of the operation that failed.
    pub operation_name: String,
    /// When the failure was observed.
    pub timestamp: SystemTime,
}

impl FailureReport {
    /// Builds a report for `error` raised by `operation_name`.
    pub fn new<E>(operation_name: &str, error: &E) -> Self
    where
        E: Error + 'static,
    {
        let kind = std::any::type_name::<E>();
        let message = error.to_string();

        let mut trace = format!("{}: {}", kind, message);
        let mut source = error.source();
        while let Some(cause) = source {
            trace.push_str(&format!("\nCaused by: {}", cause));
            source = cause.source();
        }
        let backtrace = Backtrace::capture();
        if backtrace.status() == BacktraceStatus::Captured {
            trace.push_str(&format!("\n{}", backtrace));
        }

        Self {
            kind,
            message,
            trace,
            operation_name: operation_name.to_string(),
            timestamp: SystemTime::now(),
        }
    }

    /// The report text sent to the recipient.
    pub fn body(&self) -> String {
        format!("Error: {}\n\nTrace:\n{}", self.message, self.trace)
    }
}

/// A failure report addressed from a sender to a recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    /// Sender identity.
    pub from: String,
    /// Recipient identity.
    pub to: String,
    /// `"<operation name> failed"`.
    pub subject: String,
    /// Report text, see [`FailureReport::body`].
    pub body: String,
}

impl NotificationMessage {
    /// Addresses `report` from `from` to `to`.
    pub fn new(report: &FailureReport, from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            subject: format!("{} failed", report.operation_name),
            body: report.body(),
        }
    }
}

impl fmt::Display for NotificationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Subject: {}", self.subject)?;
        writeln!(f, "From: {}", self.from)?;
        writeln!(f, "To: {}", self.to)?;
        writeln!(f)?;
        f.write_str(&self.body)
    }
}
