use crate::events::RetryEvent;
use crate::policy::RetryPolicy;
use std::sync::Arc;
use std::time::Duration;
use tower_decorate_core::events::EventListeners;
use tower_decorate_core::UNNAMED;

/// Configuration for the retry wrapper.
pub struct RetryConfig<E> {
    pub(crate) policy: RetryPolicy<E>,
    pub(crate) event_listeners: EventListeners<RetryEvent>,
    pub(crate) name: String,
}

impl<E> RetryConfig<E> {
    /// Creates a new configuration builder.
    pub fn builder() -> RetryConfigBuilder<E> {
        RetryConfigBuilder::new()
    }

    /// The attempt budget and delay in effect.
    pub fn policy(&self) -> &RetryPolicy<E> {
        &self.policy
    }

    /// The operation name used in logs and events.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Builder for [`RetryConfig`].
pub struct RetryConfigBuilder<E> {
    max_attempts: usize,
    delay: Duration,
    retry_predicate: Option<crate::RetryPredicate<E>>,
    event_listeners: EventListeners<RetryEvent>,
    name: String,
}

impl<E> Default for RetryConfigBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> RetryConfigBuilder<E> {
    /// Creates a new builder with defaults.
    ///
    /// Defaults:
    /// - max_attempts: 3
    /// - delay: 1 second
    /// - retry filter: none (every error is retried)
    /// - name: `"<unnamed>"`
    pub fn new() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
            retry_predicate: None,
            event_listeners: EventListeners::new(),
            name: UNNAMED.to_string(),
        }
    }

    /// Sets the maximum number of attempts.
    ///
    /// This includes the initial attempt, so max_attempts=3 means
    /// 1 initial attempt + 2 retries, and max_attempts=1 disables retrying.
    pub fn max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Sets the fixed pause between attempts.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Sets the filter selecting which errors are retried.
    ///
    /// Errors rejected by the filter are returned on the spot, without
    /// further attempts.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tower_decorate_retry::RetryLayer;
    /// use std::io::{Error, ErrorKind};
    ///
    /// let layer = RetryLayer::<Error>::builder()
    ///     .retry_on(|err| {
    ///         matches!(err.kind(), ErrorKind::ConnectionRefused | ErrorKind::TimedOut)
    ///     })
    ///     .build();
    /// ```
    pub fn retry_on<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.retry_predicate = Some(Arc::new(predicate));
        self
    }

    /// Sets the operation name used in logs and events.
    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Registers a callback when a retry is about to happen.
    ///
    /// # Callback Signature
    /// `Fn(usize, Duration)` - the attempt that just failed (1-based) and the
    /// delay before the next one.
    pub fn on_retry<F>(mut self, f: F) -> Self
    where
        F: Fn(usize, Duration) + Send + Sync + 'static,
    {
        self.event_listeners.add(move |event| {
            if let RetryEvent::Retry { attempt, delay, .. } = event {
                f(*attempt, *delay);
            }
        });
        self
    }

    /// Registers a callback when the operation succeeds.
    ///
    /// # Callback Signature
    /// `Fn(usize)` - total number of attempts made, 1 meaning first try.
    pub fn on_success<F>(mut self, f: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.event_listeners.add(move |event| {
            if let RetryEvent::Success { attempts, .. } = event {
                f(*attempts);
            }
        });
        self
    }

    /// Registers a callback when all attempts are exhausted.
    ///
    /// # Callback Signature
    /// `Fn(usize)` - total number of attempts made.
    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.event_listeners.add(move |event| {
            if let RetryEvent::Error { attempts, .. } = event {
                f(*attempts);
            }
        });
        self
    }

    /// Registers a callback when an error is rejected by the retry filter.
    pub fn on_ignored_error<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.event_listeners.add(move |event| {
            if matches!(event, RetryEvent::IgnoredError { .. }) {
                f();
            }
        });
        self
    }

    /// Builds the retry layer.
    ///
    /// # Panics
    ///
    /// Panics if `max_attempts` is zero.
    pub fn build(self) -> crate::RetryLayer<E> {
        assert!(
            self.max_attempts >= 1,
            "max_attempts must be at least 1 (got 0)"
        );

        let mut policy = RetryPolicy::new(self.max_attempts, self.delay);
        policy.retry_predicate = self.retry_predicate;

        let config = RetryConfig {
            policy,
            event_listeners: self.event_listeners,
            name: self.name,
        };

        crate::RetryLayer::new(config)
    }
}
