use crate::config::CallLogConfig;
use crate::CallLog;
use std::sync::Arc;
use tower::Layer;

/// A Tower layer that logs each call of the wrapped service.
#[derive(Clone)]
pub struct CallLogLayer {
    config: Arc<CallLogConfig>,
}

impl CallLogLayer {
    pub(crate) fn new(config: CallLogConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Creates a new builder for configuring a call logging layer.
    pub fn builder() -> crate::CallLogConfigBuilder {
        CallLogConfig::builder()
    }
}

impl<S> Layer<S> for CallLogLayer {
    type Service = CallLog<S>;

    fn layer(&self, service: S) -> Self::Service {
        CallLog::new(service, Arc::clone(&self.config))
    }
}
