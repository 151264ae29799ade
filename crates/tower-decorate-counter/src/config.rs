use crate::events::CallCounterEvent;
use tower_decorate_core::{EventListeners, UNNAMED};

/// Configuration for the call counter.
pub struct CallCounterConfig {
    pub(crate) event_listeners: EventListeners<CallCounterEvent>,
    pub(crate) name: String,
}

impl CallCounterConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> CallCounterConfigBuilder {
        CallCounterConfigBuilder::new()
    }
}

/// Builder for [`CallCounterConfig`].
pub struct CallCounterConfigBuilder {
    event_listeners: EventListeners<CallCounterEvent>,
    name: String,
}

impl Default for CallCounterConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CallCounterConfigBuilder {
    /// Creates a new builder with the name `"<unnamed>"`.
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

    /// Registers a callback receiving the count of each successful call.
    pub fn on_counted<F>(mut self, f: F) -> Self
    where
        F: Fn(u64) + Send + Sync + 'static,
    {
        self.event_listeners.add(move |event| {
            let CallCounterEvent::Counted { count, .. } = event;
            f(*count);
        });
        self
    }

    /// Builds the call counting layer.
    pub fn build(self) -> crate::CallCounterLayer {
        crate::CallCounterLayer::new(CallCounterConfig {
            event_listeners: self.event_listeners,
            name: self.name,
        })
    }
}
