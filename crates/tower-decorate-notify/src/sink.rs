//! Destinations for failure reports.

use crate::error::SinkError;
use crate::report::NotificationMessage;
use futures::future::{self, BoxFuture, FutureExt};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Secret used by a sink to authenticate with its transport.
///
/// The secret never shows up in `Debug` output.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps a secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Returns the secret for handing to the transport.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Delivers failure reports.
///
/// Implement this for a mail client, chat webhook or pager. The notifier
/// awaits the returned future before surfacing the operation's failure.
pub trait NotificationSink: Send + Sync {
    /// Sends `message`, authenticating with `credential`.
    fn send<'a>(
        &'a self,
        message: &'a NotificationMessage,
        credential: &'a Credential,
    ) -> BoxFuture<'a, Result<(), SinkError>>;
}

impl<T: NotificationSink + ?Sized> NotificationSink for Arc<T> {
    fn send<'a>(
        &'a self,
        message: &'a NotificationMessage,
        credential: &'a Credential,
    ) -> BoxFuture<'a, Result<(), SinkError>> {
        (**self).send(message, credential)
    }
}

/// A sink backed by a synchronous closure.
pub struct FnSink<F> {
    f: F,
}

impl<F> FnSink<F>
where
    F: Fn(&NotificationMessage, &Credential) -> Result<(), SinkError> + Send + Sync,
{
    /// Creates a sink that hands every message to `f`.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> NotificationSink for FnSink<F>
where
    F: Fn(&NotificationMessage, &Credential) -> Result<(), SinkError> + Send + Sync,
{
    fn send<'a>(
        &'a self,
        message: &'a NotificationMessage,
        credential: &'a Credential,
    ) -> BoxFuture<'a, Result<(), SinkError>> {
        future::ready((self.f)(message, credential)).boxed()
    }
}

/// A sink that writes every message to the log at warn level.
///
/// Useful during development and as a fallback when no transport is
/// configured. Always succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn send<'a>(
        &'a self,
        message: &'a NotificationMessage,
        _credential: &'a Credential,
    ) -> BoxFuture<'a, Result<(), SinkError>> {
        warn!(
            from = %message.from,
            to = %message.to,
            subject = %message.subject,
            "{}",
            message.body
        );
        future::ready(Ok(())).boxed()
    }
}
