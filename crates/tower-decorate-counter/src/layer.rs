use crate::config::CallCounterConfig;
use crate::CallCounter;
use std::sync::Arc;
use tower::Layer;

/// A Tower layer that counts calls of the wrapped service.
///
/// Each service produced by [`Layer::layer`] gets its own count; clones of
/// that service share it.
#[derive(Clone)]
pub struct CallCounterLayer {
    config: Arc<CallCounterConfig>,
}

impl CallCounterLayer {
    pub(crate) fn new(config: CallCounterConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Creates a new builder for configuring a call counting layer.
    pub fn builder() -> crate::CallCounterConfigBuilder {
        CallCounterConfig::builder()
    }
}

impl<S> Layer<S> for CallCounterLayer {
    type Service = CallCounter<S>;

    fn layer(&self, service: S) -> Self::Service {
        CallCounter::new(service, Arc::clone(&self.config))
    }
}
