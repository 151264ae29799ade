//! Call logging for Tower services.
//!
//! Logs, at info level, the operation name and its arguments when a call
//! starts and a `Finished executing` marker when it returns successfully.
//! A failed call only ever produces the start line: the error is passed
//! through and no completion marker is written.
//!
//! The request is the argument list; it is rendered with its `Debug`
//! representation, so every field of the request shows up in the log.
//!
//! ```rust
//! use tower_decorate_calllog::CallLogLayer;
//! use tower::{Layer, Service, ServiceExt, service_fn};
//!
//! # async fn example() {
//! let layer = CallLogLayer::builder().name("function_logging").build();
//! let mut service = layer.layer(service_fn(|(limit, step): (u32, u32)| async move {
//!     Ok::<_, std::io::Error>(limit / step)
//! }));
//!
//! // INFO Executing function_logging with arguments (4, 1)
//! // INFO Finished executing function_logging
//! service.ready().await.unwrap().call((4, 1)).await.unwrap();
//! # }
//! ```

mod config;
mod events;
mod layer;

pub use config::{CallLogConfig, CallLogConfigBuilder};
pub use events::CallLogEvent;
pub use layer::CallLogLayer;

use pin_project_lite::pin_project;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{ready, Context, Poll};
use std::time::Instant;
use tower::Service;
use tracing::info;

/// A Tower [`Service`] that logs the start and successful completion of
/// every call.
#[derive(Clone)]
pub struct CallLog<S> {
    inner: S,
    config: Arc<CallLogConfig>,
}

impl<S> CallLog<S> {
    /// Creates a new `CallLog` wrapping the given service.
    pub fn new(inner: S, config: Arc<CallLogConfig>) -> Self {
        Self { inner, config }
    }
}

impl<S, Req> Service<Req> for CallLog<S>
where
    S: Service<Req>,
    Req: fmt::Debug,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = CallLogFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Req) -> Self::Future {
        let config = &self.config;
        let arguments = format!("{:?}", req);
        info!(
            operation = %config.name,
            arguments = %arguments,
            "Executing {} with arguments {}",
            config.name,
            arguments
        );
        config.event_listeners.emit(&CallLogEvent::Started {
            operation_name: config.name.clone(),
            timestamp: Instant::now(),
            arguments,
        });

        CallLogFuture {
            inner: self.inner.call(req),
            config: Arc::clone(&self.config),
        }
    }
}

pin_project! {
    /// Response future of [`CallLog`].
    pub struct CallLogFuture<F> {
        #[pin]
        inner: F,
        config: Arc<CallLogConfig>,
    }
}

impl<F, T, E> Future for CallLogFuture<F>
where
    F: Future<Output = Result<T, E>>,
{
    type Output = Result<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let result = ready!(this.inner.poll(cx));
        if result.is_ok() {
            info!(operation = %this.config.name, "Finished executing {}", this.config.name);
            this.config.event_listeners.emit(&CallLogEvent::Finished {
                operation_name: this.config.name.clone(),
                timestamp: Instant::now(),
            });
        }
        Poll::Ready(result)
    }
}
