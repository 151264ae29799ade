//! Blocking rate limiting for Tower services.
//!
//! Caps how many calls of the wrapped service start within an interval. A
//! call that would exceed the rate is not rejected: it waits for its slot and
//! then runs. Slots are handed out in call order, so concurrent callers of
//! one service (and of its clones) are paced together.
//!
//! Two window types are available, see [`WindowType`]. The default,
//! [`WindowType::Smooth`], spaces admissions `interval / max_per_interval`
//! apart. At 2 calls per second, ten back-to-back calls take at least 4.5
//! seconds.
//!
//! The limiter state lives in memory and is scoped to the wrapped service.
//!
//! A call reserves its slot when it is made. Dropping the returned future
//! before the slot arrives does not give the slot back: later callers keep
//! the positions they were handed, so cancelled calls still count against
//! the rate.
//!
//! ```rust
//! use tower_decorate_ratelimiter::RateLimiterLayer;
//! use tower::{Layer, Service, ServiceExt, service_fn};
//! use std::time::Duration;
//!
//! # async fn example() {
//! let layer = RateLimiterLayer::builder()
//!     .max_per_interval(2)
//!     .interval(Duration::from_secs(1))
//!     .build();
//!
//! let mut service = layer.layer(service_fn(|n: u32| async move {
//!     Ok::<_, std::io::Error>(n * 2)
//! }));
//!
//! for n in 0..10 {
//!     service.ready().await.unwrap().call(n).await.unwrap();
//! }
//! # }
//! ```

mod config;
mod events;
mod layer;
mod limiter;

pub use config::{RateLimiterConfig, RateLimiterConfigBuilder};
pub use events::RateLimiterEvent;
pub use layer::RateLimiterLayer;
pub use limiter::WindowType;

use futures::future::BoxFuture;
use limiter::SharedRateLimiter;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;
use tower::Service;
use tracing::debug;

#[cfg(feature = "metrics")]
use metrics::{counter, histogram};

/// A Tower [`Service`] that paces calls of the wrapped service.
#[derive(Clone)]
pub struct RateLimiter<S> {
    inner: S,
    config: Arc<RateLimiterConfig>,
    limiter: SharedRateLimiter,
}

impl<S> RateLimiter<S> {
    pub(crate) fn new(inner: S, config: Arc<RateLimiterConfig>, limiter: SharedRateLimiter) -> Self {
        Self {
            inner,
            config,
            limiter,
        }
    }
}

impl<S, Req> Service<Req> for RateLimiter<S>
where
    S: Service<Req> + Clone + Send + 'static,
    S::Future: Send + 'static,
    Req: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Req) -> Self::Future {
        // Take the service that was driven to readiness and leave a clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let config = Arc::clone(&self.config);

        // Reserve now so admission order follows call order.
        let slot = self.limiter.reserve();

        Box::pin(async move {
            let wait_duration = SharedRateLimiter::wait_for(slot).await;

            if !wait_duration.is_zero() {
                debug!(
                    operation = %config.name,
                    waited_ms = wait_duration.as_millis() as u64,
                    "rate limit reached, call delayed"
                );
            }

            #[cfg(feature = "metrics")]
            {
                counter!("ratelimiter_calls_total", "ratelimiter" => config.name.clone()).increment(1);
                histogram!("ratelimiter_wait_duration_seconds", "ratelimiter" => config.name.clone())
                    .record(wait_duration.as_secs_f64());
            }

            config.event_listeners.emit(&RateLimiterEvent::PermitAcquired {
                operation_name: config.name.clone(),
                timestamp: Instant::now(),
                wait_duration,
            });

            inner.call(req).await
        })
    }
}
