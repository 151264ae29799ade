use crate::{Retry, RetryConfig};
use std::sync::Arc;
use tower::Layer;

/// A Tower [`Layer`] that applies retry logic to a service.
///
/// # Examples
///
/// ```
/// use tower_decorate_retry::RetryLayer;
/// use tower::ServiceBuilder;
/// use std::time::Duration;
///
/// # #[derive(Debug, Clone)]
/// # enum MyError { Transient, Fatal }
/// # async fn example() {
/// let retry_layer = RetryLayer::<MyError>::builder()
///     .max_attempts(5)
///     .delay(Duration::from_millis(100))
///     .retry_on(|e| matches!(e, MyError::Transient))
///     .build();
///
/// let service = ServiceBuilder::new()
///     .layer(retry_layer)
///     .service(tower::service_fn(|req: String| async move { Ok::<_, MyError>(req) }));
/// # }
/// ```
pub struct RetryLayer<E> {
    config: Arc<RetryConfig<E>>,
}

impl<E> RetryLayer<E> {
    /// Creates a new `RetryLayer` with the given configuration.
    pub fn new(config: RetryConfig<E>) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Creates a new builder for configuring a retry layer.
    pub fn builder() -> crate::RetryConfigBuilder<E> {
        crate::RetryConfigBuilder::new()
    }

    /// Returns the configuration shared by every service this layer wraps.
    pub fn config(&self) -> &RetryConfig<E> {
        &self.config
    }
}

impl<E> Clone for RetryLayer<E> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
        }
    }
}

impl<S, E> Layer<S> for RetryLayer<E> {
    type Service = Retry<S, E>;

    fn layer(&self, service: S) -> Self::Service {
        Retry::new(service, Arc::clone(&self.config))
    }
}
