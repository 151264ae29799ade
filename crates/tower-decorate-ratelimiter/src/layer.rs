use crate::config::RateLimiterConfig;
use crate::limiter::SharedRateLimiter;
use crate::RateLimiter;
use std::sync::Arc;
use tower::Layer;

/// A Tower layer that paces calls of the wrapped service.
///
/// Each service produced by [`Layer::layer`] gets its own limiter state;
/// clones of that service share it, so concurrent callers are paced
/// together.
#[derive(Clone)]
pub struct RateLimiterLayer {
    config: Arc<RateLimiterConfig>,
}

impl RateLimiterLayer {
    pub(crate) fn new(config: RateLimiterConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Creates a new builder for configuring a rate limiting layer.
    ///
    /// # Examples
    ///
    /// ```
    /// use tower_decorate_ratelimiter::{RateLimiterLayer, WindowType};
    /// use std::time::Duration;
    ///
    /// let layer = RateLimiterLayer::builder()
    ///     .max_per_interval(2)
    ///     .interval(Duration::from_secs(1))
    ///     .window_type(WindowType::Fixed)
    ///     .name("quote_feed")
    ///     .build();
    /// ```
    pub fn builder() -> crate::RateLimiterConfigBuilder {
        RateLimiterConfig::builder()
    }

    /// The configuration shared by services built from this layer.
    pub fn config(&self) -> &RateLimiterConfig {
        &self.config
    }
}

impl<S> Layer<S> for RateLimiterLayer {
    type Service = RateLimiter<S>;

    fn layer(&self, service: S) -> Self::Service {
        let limiter = SharedRateLimiter::new(
            self.config.max_per_interval,
            self.config.interval,
            self.config.window_type,
        );
        RateLimiter::new(service, Arc::clone(&self.config), limiter)
    }
}
