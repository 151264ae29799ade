use crate::events::TimerEvent;
use std::time::Duration;
use tower_decorate_core::{EventListeners, UNNAMED};

/// Configuration for the timing wrapper.
pub struct TimerConfig {
    pub(crate) event_listeners: EventListeners<TimerEvent>,
    pub(crate) name: String,
}

impl TimerConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> TimerConfigBuilder {
        TimerConfigBuilder::new()
    }

    /// The operation name used in logs and events.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Builder for [`TimerConfig`].
pub struct TimerConfigBuilder {
    event_listeners: EventListeners<TimerEvent>,
    name: String,
}

impl Default for TimerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerConfigBuilder {
    /// Creates a new builder with the name `"<unnamed>"` and no listeners.
    pub fn new() -> Self {
        Self {
            event_listeners: EventListeners::new(),
            name: UNNAMED.to_string(),
        }
    }

    /// Sets the operation name used in logs and events.
    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Registers a callback receiving the duration of every invocation,
    /// successful or not.
    pub fn on_complete<F>(mut self, f: F) -> Self
    where
        F: Fn(Duration) + Send + Sync + 'static,
    {
        self.event_listeners.add(move |event: &TimerEvent| {
            f(event.duration());
        });
        self
    }

    /// Registers a callback receiving the duration of successful invocations.
    pub fn on_success<F>(mut self, f: F) -> Self
    where
        F: Fn(Duration) + Send + Sync + 'static,
    {
        self.event_listeners.add(move |event| {
            if let TimerEvent::Success { duration, .. } = event {
                f(*duration);
            }
        });
        self
    }

    /// Registers a callback receiving the duration of failed invocations.
    pub fn on_failure<F>(mut self, f: F) -> Self
    where
        F: Fn(Duration) + Send + Sync + 'static,
    {
        self.event_listeners.add(move |event| {
            if let TimerEvent::Failure { duration, .. } = event {
                f(*duration);
            }
        });
        self
    }

    /// Builds the timing layer.
    pub fn build(self) -> crate::TimerLayer {
        crate::TimerLayer::new(TimerConfig {
            event_listeners: self.event_listeners,
            name: self.name,
        })
    }
}
