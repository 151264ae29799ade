use crate::config::TimerConfig;
use crate::Timer;
use std::sync::Arc;
use tower::Layer;

/// A Tower layer that measures how long each call of the wrapped service takes.
#[derive(Clone)]
pub struct TimerLayer {
    config: Arc<TimerConfig>,
}

impl TimerLayer {
    pub(crate) fn new(config: TimerConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Creates a new builder for configuring a timing layer.
    ///
    /// # Examples
    ///
    /// ```
    /// use tower_decorate_timer::TimerLayer;
    ///
    /// let layer = TimerLayer::builder()
    ///     .name("count_function_timing")
    ///     .on_complete(|elapsed| println!("took {:?}", elapsed))
    ///     .build();
    /// ```
    pub fn builder() -> crate::TimerConfigBuilder {
        TimerConfig::builder()
    }

    /// Returns the configuration shared by every service this layer wraps.
    pub fn config(&self) -> &TimerConfig {
        &self.config
    }
}

impl<S> Layer<S> for TimerLayer {
    type Service = Timer<S>;

    fn layer(&self, service: S) -> Self::Service {
        Timer::new(service, Arc::clone(&self.config))
    }
}
