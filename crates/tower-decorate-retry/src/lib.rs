//! Fixed-delay retry wrapper for Tower services.
//!
//! Re-invokes a failing operation up to a fixed number of attempts, pausing a
//! fixed delay between attempts. Only errors accepted by the retry filter are
//! retried; anything else is returned on the spot. When the attempt budget is
//! exhausted the final error is returned unchanged, so callers can still match
//! on it.
//!
//! Each retry logs a warning naming the operation, the attempt number and the
//! failure.
//!
//! # Examples
//!
//! ```
//! use tower_decorate_retry::RetryConfig;
//! use tower::ServiceBuilder;
//! use std::time::Duration;
//!
//! # #[derive(Debug, Clone)]
//! # struct MyError;
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let retry_layer = RetryConfig::<MyError>::builder()
//!     .max_attempts(5)
//!     .delay(Duration::from_millis(100))
//!     .name("fetch_quote")
//!     .on_retry(|attempt, delay| {
//!         println!("attempt {} failed, next in {:?}", attempt, delay);
//!     })
//!     .build();
//!
//! let service = ServiceBuilder::new()
//!     .layer(retry_layer)
//!     .service(tower::service_fn(|req: String| async move {
//!         Ok::<_, MyError>(format!("Response: {}", req))
//!     }));
//! # Ok(())
//! # }
//! ```

mod config;
mod events;
mod layer;
mod policy;

pub use config::{RetryConfig, RetryConfigBuilder};
pub use events::RetryEvent;
pub use layer::RetryLayer;
pub use policy::{RetryPolicy, RetryPredicate};

use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;
use tower::{Service, ServiceExt};
use tracing::warn;

#[cfg(feature = "metrics")]
use metrics::counter;

/// A Tower [`Service`] that retries failed requests.
///
/// Every outer invocation starts a fresh attempt counter; nothing is carried
/// over between calls.
pub struct Retry<S, E> {
    inner: S,
    config: Arc<RetryConfig<E>>,
}

impl<S, E> Retry<S, E> {
    /// Creates a new `Retry` service wrapping the given service.
    pub fn new(inner: S, config: Arc<RetryConfig<E>>) -> Self {
        Self { inner, config }
    }

    /// Returns a reference to the wrapped service.
    pub fn get_ref(&self) -> &S {
        &self.inner
    }
}

impl<S, E> Clone for Retry<S, E>
where
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S, Req, E> Service<Req> for Retry<S, E>
where
    S: Service<Req, Error = E> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Response: Send + 'static,
    Req: Clone + Send + 'static,
    E: fmt::Debug + Send + 'static,
{
    type Response = S::Response;
    type Error = E;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Req) -> Self::Future {
        // Take the service that was driven to readiness, leave a clone behind.
        let clone = self.inner.clone();
        let mut service = std::mem::replace(&mut self.inner, clone);
        let config = Arc::clone(&self.config);

        Box::pin(async move {
            let policy = &config.policy;
            let mut attempt = 1;

            loop {
                let result = match service.ready().await {
                    Ok(ready) => ready.call(req.clone()).await,
                    Err(error) => Err(error),
                };

                let error = match result {
                    Ok(response) => {
                        #[cfg(feature = "metrics")]
                        counter!("retry_calls_total", "retry" => config.name.clone(), "result" => "success")
                            .increment(1);

                        config.event_listeners.emit(&RetryEvent::Success {
                            operation_name: config.name.clone(),
                            timestamp: Instant::now(),
                            attempts: attempt,
                        });
                        return Ok(response);
                    }
                    Err(error) => error,
                };

                if !policy.should_retry(&error) {
                    #[cfg(feature = "metrics")]
                    counter!("retry_calls_total", "retry" => config.name.clone(), "result" => "ignored")
                        .increment(1);

                    config.event_listeners.emit(&RetryEvent::IgnoredError {
                        operation_name: config.name.clone(),
                        timestamp: Instant::now(),
                        attempts: attempt,
                    });
                    return Err(error);
                }

                if !policy.has_attempts_left(attempt) {
                    #[cfg(feature = "metrics")]
                    counter!("retry_calls_total", "retry" => config.name.clone(), "result" => "exhausted")
                        .increment(1);

                    warn!(
                        operation = %config.name,
                        attempts = attempt,
                        error = ?error,
                        "{} failed after {} attempts, giving up",
                        config.name,
                        attempt
                    );
                    config.event_listeners.emit(&RetryEvent::Error {
                        operation_name: config.name.clone(),
                        timestamp: Instant::now(),
                        attempts: attempt,
                    });
                    return Err(error);
                }

                let delay = policy.delay();
                warn!(
                    operation = %config.name,
                    attempt,
                    error = ?error,
                    "{} failed with {:?}, retrying in {:?}",
                    config.name,
                    error,
                    delay
                );

                #[cfg(feature = "metrics")]
                counter!("retry_attempts_total", "retry" => config.name.clone()).increment(1);

                config.event_listeners.emit(&RetryEvent::Retry {
                    operation_name: config.name.clone(),
                    timestamp: Instant::now(),
                    attempt,
                    delay,
                });

                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                attempt += 1;
            }
        })
    }
}
