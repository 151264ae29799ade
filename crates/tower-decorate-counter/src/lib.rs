//! Invocation counting for Tower services.
//!
//! Every call increments the wrapped operation's count before the operation
//! is invoked. When the call returns successfully an info-level line reports
//! the operation name and the count; failed calls are still counted but skip
//! that line.
//!
//! The count lives in a [`CallCount`] handle owned by the wrapped service.
//! Grab it with [`CallCounter::count`] before stacking further layers:
//!
//! ```rust
//! use tower_decorate_counter::CallCounterLayer;
//! use tower::{Layer, Service, ServiceExt, service_fn};
//!
//! # async fn example() {
//! let counted = CallCounterLayer::builder()
//!     .name("send_report")
//!     .build()
//!     .layer(service_fn(|_: ()| async { Ok::<_, std::io::Error>(()) }));
//! let count = counted.count();
//!
//! let mut service = counted;
//! service.ready().await.unwrap().call(()).await.unwrap();
//! assert_eq!(count.get(), 1);
//! # }
//! ```

mod config;
mod count;
mod events;
mod layer;

pub use config::{CallCounterConfig, CallCounterConfigBuilder};
pub use count::CallCount;
pub use events::CallCounterEvent;
pub use layer::CallCounterLayer;

use pin_project_lite::pin_project;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{ready, Context, Poll};
use std::time::Instant;
use tower::Service;
use tracing::info;

#[cfg(feature = "metrics")]
use metrics::counter;

/// A Tower [`Service`] that counts its invocations.
#[derive(Clone)]
pub struct CallCounter<S> {
    inner: S,
    config: Arc<CallCounterConfig>,
    count: CallCount,
}

impl<S> CallCounter<S> {
    /// Creates a new `CallCounter` starting from zero.
    pub fn new(inner: S, config: Arc<CallCounterConfig>) -> Self {
        Self {
            inner,
            config,
            count: CallCount::new(),
        }
    }

    /// Returns a handle to this service's invocation count.
    pub fn count(&self) -> CallCount {
        self.count.clone()
    }
}

impl<S, Req> Service<Req> for CallCounter<S>
where
    S: Service<Req>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = CallCounterFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Req) -> Self::Future {
        let count = self.count.increment();

        #[cfg(feature = "metrics")]
        counter!("calls_total", "operation" => self.config.name.clone()).increment(1);

        CallCounterFuture {
            inner: self.inner.call(req),
            count,
            config: Arc::clone(&self.config),
        }
    }
}

pin_project! {
    /// Response future of [`CallCounter`].
    pub struct CallCounterFuture<F> {
        #[pin]
        inner: F,
        count: u64,
        config: Arc<CallCounterConfig>,
    }
}

impl<F, T, E> Future for CallCounterFuture<F>
where
    F: Future<Output = Result<T, E>>,
{
    type Output = Result<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let result = ready!(this.inner.poll(cx));
        if result.is_ok() {
            let name = &this.config.name;
            info!(operation = %name, count = *this.count, "{} has been called {} times", name, this.count);
            this.config.event_listeners.emit(&CallCounterEvent::Counted {
                operation_name: name.clone(),
                timestamp: Instant::now(),
                count: *this.count,
            });
        }
        Poll::Ready(result)
    }
}
