use crate::events::RateLimiterEvent;
use crate::limiter::WindowType;
use std::time::Duration;
use tower_decorate_core::{EventListeners, UNNAMED};

/// Configuration for the rate limiter.
pub struct RateLimiterConfig {
    pub(crate) max_per_interval: u32,
    pub(crate) interval: Duration,
    pub(crate) window_type: WindowType,
    pub(crate) event_listeners: EventListeners<RateLimiterEvent>,
    pub(crate) name: String,
}

impl RateLimiterConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> RateLimiterConfigBuilder {
        RateLimiterConfigBuilder::new()
    }

    /// Maximum admissions per interval.
    pub fn max_per_interval(&self) -> u32 {
        self.max_per_interval
    }

    /// Length of the interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// How admissions are spread over the interval.
    pub fn window_type(&self) -> WindowType {
        self.window_type
    }
}

/// Builder for [`RateLimiterConfig`].
pub struct RateLimiterConfigBuilder {
    max_per_interval: u32,
    interval: Duration,
    window_type: WindowType,
    event_listeners: EventListeners<RateLimiterEvent>,
    name: String,
}

impl Default for RateLimiterConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiterConfigBuilder {
    /// Creates a new builder with defaults.
    ///
    /// Defaults:
    /// - max_per_interval: 50
    /// - interval: 1 second
    /// - window_type: [`WindowType::Smooth`]
    /// - name: `"<unnamed>"`
    pub fn new() -> Self {
        Self {
            max_per_interval: 50,
            interval: Duration::from_secs(1),
            window_type: WindowType::default(),
            event_listeners: EventListeners::new(),
            name: UNNAMED.to_string(),
        }
    }

    /// Sets the maximum number of calls admitted per interval.
    pub fn max_per_interval(mut self, max: u32) -> Self {
        self.max_per_interval = max;
        self
    }

    /// Sets the length of the interval.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Sets how admissions are spread over the interval.
    pub fn window_type(mut self, window_type: WindowType) -> Self {
        self.window_type = window_type;
        self
    }

    /// Sets the operation name used in logs and events.
    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Registers a callback when a call is admitted.
    ///
    /// Receives how long the call waited for its slot; zero when it was
    /// admitted immediately.
    pub fn on_permit_acquired<F>(mut self, f: F) -> Self
    where
        F: Fn(Duration) + Send + Sync + 'static,
    {
        self.event_listeners.add(move |event| {
            let RateLimiterEvent::PermitAcquired { wait_duration, .. } = event;
            f(*wait_duration);
        });
        self
    }

    /// Builds the rate limiting layer.
    ///
    /// # Panics
    ///
    /// Panics if `max_per_interval` is zero or `interval` is zero.
    pub fn build(self) -> crate::RateLimiterLayer {
        assert!(
            self.max_per_interval >= 1,
            "max_per_interval must be at least 1 (got 0)"
        );
        assert!(!self.interval.is_zero(), "interval must be non-zero");

        crate::RateLimiterLayer::new(RateLimiterConfig {
            max_per_interval: self.max_per_interval,
            interval: self.interval,
            window_type: self.window_type,
            event_listeners: self.event_listeners,
            name: self.name,
        })
    }
}
