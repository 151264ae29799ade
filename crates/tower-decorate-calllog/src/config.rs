use crate::events::CallLogEvent;
use tower_decorate_core::{EventListeners, UNNAMED};

/// Configuration for the call logger.
pub struct CallLogConfig {
    pub(crate) event_listeners: EventListeners<CallLogEvent>,
    pub(crate) name: String,
}

impl CallLogConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> CallLogConfigBuilder {
        CallLogConfigBuilder::new()
    }

    /// The operation name used in logs and events.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Builder for [`CallLogConfig`].
pub struct CallLogConfigBuilder {
    event_listeners: EventListeners<CallLogEvent>,
    name: String,
}

impl Default for CallLogConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CallLogConfigBuilder {
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

    /// Registers a callback receiving the rendered arguments of each call.
    pub fn on_start<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.event_listeners.add(move |event| {
            if let CallLogEvent::Started { arguments, .. } = event {
                f(arguments);
            }
        });
        self
    }

    /// Registers a callback for each successful completion.
    pub fn on_finish<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.event_listeners.add(move |event| {
            if matches!(event, CallLogEvent::Finished { .. }) {
                f();
            }
        });
        self
    }

    /// Builds the call logging layer.
    pub fn build(self) -> crate::CallLogLayer {
        crate::CallLogLayer::new(CallLogConfig {
            event_listeners: self.event_listeners,
            name: self.name,
        })
    }
}
