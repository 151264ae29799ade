use crate::error::SinkError;
use crate::events::NotifierEvent;
use crate::sink::{Credential, NotificationSink};
use std::sync::Arc;
use tower_decorate_core::{EventListeners, UNNAMED};

/// Configuration for the failure notifier.
pub struct NotifierConfig {
    pub(crate) sink: Arc<dyn NotificationSink>,
    pub(crate) from: String,
    pub(crate) to: String,
    pub(crate) credential: Credential,
    pub(crate) event_listeners: EventListeners<NotifierEvent>,
    pub(crate) name: String,
}

impl NotifierConfig {
    /// Creates a new configuration builder delivering reports to `sink`.
    pub fn builder<K>(sink: K) -> NotifierConfigBuilder
    where
        K: NotificationSink + 'static,
    {
        NotifierConfigBuilder::new(sink)
    }

    /// Sender identity of every report.
    pub fn from(&self) -> &str {
        &self.from
    }

    /// Recipient identity of every report.
    pub fn to(&self) -> &str {
        &self.to
    }

    /// Name of the wrapped operation.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Builder for [`NotifierConfig`].
pub struct NotifierConfigBuilder {
    sink: Arc<dyn NotificationSink>,
    from: String,
    to: String,
    credential: Credential,
    event_listeners: EventListeners<NotifierEvent>,
    name: String,
}

impl NotifierConfigBuilder {
    /// Creates a new builder delivering reports to `sink`.
    ///
    /// Sender and recipient must be set before [`build`](Self::build). The
    /// credential defaults to empty and the name to `"<unnamed>"`.
    pub fn new<K>(sink: K) -> Self
    where
        K: NotificationSink + 'static,
    {
        Self {
            sink: Arc::new(sink),
            from: String::new(),
            to: String::new(),
            credential: Credential::default(),
            event_listeners: EventListeners::new(),
            name: UNNAMED.to_string(),
        }
    }

    /// Sets the sender identity.
    pub fn from<S: Into<String>>(mut self, from: S) -> Self {
        self.from = from.into();
        self
    }

    /// Sets the recipient identity.
    pub fn to<S: Into<String>>(mut self, to: S) -> Self {
        self.to = to.into();
        self
    }

    /// Sets the credential handed to the sink with every report.
    pub fn credential(mut self, credential: Credential) -> Self {
        self.credential = credential;
        self
    }

    /// Sets the operation name used in logs, events and report subjects.
    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Registers a callback when a report was delivered.
    ///
    /// Receives the recipient.
    pub fn on_notification_sent<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.event_listeners.add(move |event| {
            if let NotifierEvent::NotificationSent { recipient, .. } = event {
                f(recipient.as_str());
            }
        });
        self
    }

    /// Registers a callback when a report could not be delivered.
    pub fn on_notification_failed<F>(mut self, f: F) -> Self
    where
        F: Fn(&SinkError) + Send + Sync + 'static,
    {
        self.event_listeners.add(move |event| {
            if let NotifierEvent::NotificationFailed { error, .. } = event {
                f(error);
            }
        });
        self
    }

    /// Builds the failure notification layer.
    ///
    /// # Panics
    ///
    /// Panics if the sender or the recipient is empty.
    pub fn build(self) -> crate::NotifierLayer {
        assert!(!self.from.is_empty(), "notifier sender must be set");
        assert!(!self.to.is_empty(), "notifier recipient must be set");

        crate::NotifierLayer::new(NotifierConfig {
            sink: self.sink,
            from: self.from,
            to: self.to,
            credential: self.credential,
            event_listeners: self.event_listeners,
            name: self.name,
        })
    }
}
