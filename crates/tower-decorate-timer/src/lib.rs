//! Wall-clock timing for Tower services.
//!
//! Measures each invocation from just before the wrapped service is called
//! until its future resolves, including any time spent suspended, and reports
//! the duration through an info-level log line and [`TimerEvent`]s. The result
//! and the error are passed through untouched.
//!
//! Synchronous callables lifted with [`tower_decorate_core::sync_fn`] run
//! inside `call`, which is inside the measured span, so both kinds of
//! operation are timed by the same code.
//!
//! ```rust
//! use tower_decorate_timer::TimerLayer;
//! use tower::{Layer, Service, ServiceExt, service_fn};
//! use std::time::Duration;
//!
//! # async fn example() {
//! let layer = TimerLayer::builder()
//!     .name("slow_lookup")
//!     .on_success(|elapsed| println!("ok in {:?}", elapsed))
//!     .build();
//!
//! let mut service = layer.layer(service_fn(|ms: u64| async move {
//!     tokio::time::sleep(Duration::from_millis(ms)).await;
//!     Ok::<_, std::io::Error>(ms)
//! }));
//!
//! service.ready().await.unwrap().call(10).await.unwrap();
//! # }
//! ```

mod config;
mod events;
mod layer;

pub use config::{TimerConfig, TimerConfigBuilder};
pub use events::TimerEvent;
pub use layer::TimerLayer;

use pin_project_lite::pin_project;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{ready, Context, Poll};
use tokio::time::Instant;
use tower::Service;
use tracing::info;

#[cfg(feature = "metrics")]
use metrics::histogram;

/// A Tower [`Service`] that times every call of the wrapped service.
#[derive(Clone)]
pub struct Timer<S> {
    inner: S,
    config: Arc<TimerConfig>,
}

impl<S> Timer<S> {
    /// Creates a new `Timer` wrapping the given service.
    pub fn new(inner: S, config: Arc<TimerConfig>) -> Self {
        Self { inner, config }
    }
}

impl<S, Req> Service<Req> for Timer<S>
where
    S: Service<Req>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = TimerFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Req) -> Self::Future {
        let started = Instant::now();
        let inner = self.inner.call(req);
        TimerFuture {
            inner,
            started,
            config: Arc::clone(&self.config),
        }
    }
}

pin_project! {
    /// Response future of [`Timer`].
    ///
    /// Suspends exactly where the inner future suspends.
    pub struct TimerFuture<F> {
        #[pin]
        inner: F,
        started: Instant,
        config: Arc<TimerConfig>,
    }
}

impl<F, T, E> Future for TimerFuture<F>
where
    F: Future<Output = Result<T, E>>,
{
    type Output = Result<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let result = ready!(this.inner.poll(cx));
        let duration = this.started.elapsed();
        let config = &**this.config;
        let timestamp = std::time::Instant::now();

        #[cfg(feature = "metrics")]
        histogram!("call_duration_seconds", "operation" => config.name.clone(), "result" => if result.is_ok() { "success" } else { "failure" })
            .record(duration.as_secs_f64());

        let event = if result.is_ok() {
            info!(
                operation = %config.name,
                elapsed_ms = duration.as_millis() as u64,
                "{} took {:.3} seconds to run",
                config.name,
                duration.as_secs_f64()
            );
            TimerEvent::Success {
                operation_name: config.name.clone(),
                timestamp,
                duration,
            }
        } else {
            info!(
                operation = %config.name,
                elapsed_ms = duration.as_millis() as u64,
                "{} failed after {:.3} seconds",
                config.name,
                duration.as_secs_f64()
            );
            TimerEvent::Failure {
                operation_name: config.name.clone(),
                timestamp,
                duration,
            }
        };
        config.event_listeners.emit(&event);

        Poll::Ready(result)
    }
}
