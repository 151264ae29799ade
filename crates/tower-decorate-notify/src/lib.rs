//! Failure notification for Tower services.
//!
//! When the wrapped service fails, a [`FailureReport`] is built from the
//! error (message, type name, source chain and, when enabled, a backtrace),
//! addressed from the configured sender to the configured recipient with the
//! subject `"<name> failed"`, and handed to a [`NotificationSink`] together
//! with the configured [`Credential`]. The call then fails with the
//! operation's error.
//!
//! Successful calls pass through untouched and produce no report.
//!
//! ## Error precedence
//!
//! The sink may fail too. In that case the caller receives
//! [`NotifierError::Sink`], which carries both the sink failure and the
//! operation's failure; otherwise [`NotifierError::Operation`] carries the
//! operation's failure alone. Either way
//! [`NotifierError::into_original`] recovers it.
//!
//! A call whose future is dropped before completing produces no report.
//!
//! ```rust
//! use tower_decorate_notify::{Credential, FnSink, NotificationMessage, NotifierLayer};
//! use tower::{Layer, Service, ServiceExt, service_fn};
//!
//! # async fn example() {
//! let sink = FnSink::new(|message: &NotificationMessage, _: &Credential| {
//!     eprintln!("{}", message);
//!     Ok(())
//! });
//! let layer = NotifierLayer::builder(sink)
//!     .from("alerts@example.com")
//!     .to("oncall@example.com")
//!     .name("nightly_export")
//!     .build();
//!
//! let mut service = layer.layer(service_fn(|_: ()| async {
//!     Err::<(), _>(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
//! }));
//!
//! let err = service.ready().await.unwrap().call(()).await.unwrap_err();
//! assert_eq!(err.into_original().to_string(), "disk full");
//! # }
//! ```

mod config;
mod error;
mod events;
mod layer;
mod report;
mod sink;

pub use config::{NotifierConfig, NotifierConfigBuilder};
pub use error::{NotifierError, SinkError};
pub use events::NotifierEvent;
pub use layer::NotifierLayer;
pub use report::{FailureReport, NotificationMessage};
pub use sink::{Credential, FnSink, LogSink, NotificationSink};

use futures::future::BoxFuture;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;
use tower::Service;
use tracing::error;

/// A Tower [`Service`] that reports failures of the wrapped service.
#[derive(Clone)]
pub struct Notifier<S> {
    inner: S,
    config: Arc<NotifierConfig>,
}

impl<S> Notifier<S> {
    /// Creates a new `Notifier` wrapping the given service.
    pub fn new(inner: S, config: Arc<NotifierConfig>) -> Self {
        Self { inner, config }
    }
}

impl<S, Req> Service<Req> for Notifier<S>
where
    S: Service<Req>,
    S::Response: Send + 'static,
    S::Future: Send + 'static,
    S::Error: std::error::Error + Send + 'static,
{
    type Response = S::Response;
    type Error = NotifierError<S::Error>;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(NotifierError::Operation)
    }

    fn call(&mut self, req: Req) -> Self::Future {
        let future = self.inner.call(req);
        let config = Arc::clone(&self.config);

        Box::pin(async move {
            match future.await {
                Ok(response) => Ok(response),
                Err(err) => Err(notify(&config, err).await),
            }
        })
    }
}

/// Reports `err` through the configured sink and decides what the caller sees.
async fn notify<E>(config: &NotifierConfig, err: E) -> NotifierError<E>
where
    E: std::error::Error + 'static,
{
    error!(
        operation = %config.name,
        recipient = %config.to,
        sender = %config.from,
        "{} failed, sending a report to {} via {}",
        config.name,
        config.to,
        config.from
    );

    let report = FailureReport::new(&config.name, &err);
    let message = NotificationMessage::new(&report, &config.from, &config.to);

    match config.sink.send(&message, &config.credential).await {
        Ok(()) => {
            config.event_listeners.emit(&NotifierEvent::NotificationSent {
                operation_name: config.name.clone(),
                timestamp: Instant::now(),
                recipient: config.to.clone(),
            });
            NotifierError::Operation(err)
        }
        Err(sink_err) => {
            error!(
                operation = %config.name,
                error = %sink_err,
                "could not deliver failure report for {}",
                config.name
            );
            config.event_listeners.emit(&NotifierEvent::NotificationFailed {
                operation_name: config.name.clone(),
                timestamp: Instant::now(),
                error: sink_err.clone(),
            });
            NotifierError::Sink {
                source: sink_err,
                original: err,
            }
        }
    }
}
