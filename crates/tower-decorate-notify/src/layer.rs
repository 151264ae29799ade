use crate::config::NotifierConfig;
use crate::sink::NotificationSink;
use crate::Notifier;
use std::sync::Arc;
use tower::Layer;

/// A Tower layer that reports failures of the wrapped service to a
/// [`NotificationSink`].
#[derive(Clone)]
pub struct NotifierLayer {
    config: Arc<NotifierConfig>,
}

impl NotifierLayer {
    pub(crate) fn new(config: NotifierConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Creates a new builder delivering reports to `sink`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tower_decorate_notify::{Credential, LogSink, NotifierLayer};
    ///
    /// let layer = NotifierLayer::builder(LogSink)
    ///     .from("alerts@example.com")
    ///     .to("oncall@example.com")
    ///     .credential(Credential::new("app-password"))
    ///     .name("nightly_export")
    ///     .build();
    /// ```
    pub fn builder<K>(sink: K) -> crate::NotifierConfigBuilder
    where
        K: NotificationSink + 'static,
    {
        NotifierConfig::builder(sink)
    }

    /// The configuration shared by services built from this layer.
    pub fn config(&self) -> &NotifierConfig {
        &self.config
    }
}

impl<S> Layer<S> for NotifierLayer {
    type Service = Notifier<S>;

    fn layer(&self, service: S) -> Self::Service {
        Notifier::new(service, Arc::clone(&self.config))
    }
}
