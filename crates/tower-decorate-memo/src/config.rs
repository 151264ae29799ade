//! Configuration for memoization.

use crate::events::MemoEvent;
use std::sync::Arc;
use tower_decorate_core::{EventListeners, UNNAMED};

/// Function that derives the memo key from a request.
pub type KeyExtractor<Req, K> = Arc<dyn Fn(&Req) -> K + Send + Sync>;

/// Configuration for the memoizing wrapper.
pub struct MemoConfig<Req, K> {
    pub(crate) key_extractor: KeyExtractor<Req, K>,
    pub(crate) event_listeners: EventListeners<MemoEvent>,
    pub(crate) name: String,
}

impl<Req, K> MemoConfig<Req, K> {
    /// The operation name used in logs and events.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Derives the memo key for a request.
    pub fn key_for(&self, req: &Req) -> K {
        (self.key_extractor)(req)
    }
}

/// Builder for configuring and constructing a memoizing layer.
///
/// By default the whole request is the key, so every argument takes part in
/// identity. Use [`key_extractor`](Self::key_extractor) to narrow it.
pub struct MemoConfigBuilder<Req, K> {
    key_extractor: KeyExtractor<Req, K>,
    event_listeners: EventListeners<MemoEvent>,
    name: String,
}

impl<Req> MemoConfigBuilder<Req, Req>
where
    Req: Clone + 'static,
{
    /// Creates a new builder keyed by the full request.
    pub fn new() -> Self {
        Self {
            key_extractor: Arc::new(|req: &Req| req.clone()),
            event_listeners: EventListeners::new(),
            name: String::from(UNNAMED),
        }
    }
}

impl<Req> Default for MemoConfigBuilder<Req, Req>
where
    Req: Clone + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<Req, K> MemoConfigBuilder<Req, K> {
    /// Sets the function that derives the memo key from a request.
    ///
    /// Parts of the request left out of the key no longer distinguish calls:
    /// two requests with the same key replay the same stored result.
    pub fn key_extractor<K2, F>(self, f: F) -> MemoConfigBuilder<Req, K2>
    where
        F: Fn(&Req) -> K2 + Send + Sync + 'static,
    {
        MemoConfigBuilder {
            key_extractor: Arc::new(f),
            event_listeners: self.event_listeners,
            name: self.name,
        }
    }

    /// Sets the operation name used in logs and events.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Registers a callback when a stored result is replayed.
    pub fn on_hit<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.event_listeners.add(move |event| {
            if matches!(event, MemoEvent::Hit { .. }) {
                f();
            }
        });
        self
    }

    /// Registers a callback when the operation has to be invoked.
    pub fn on_miss<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.event_listeners.add(move |event| {
            if matches!(event, MemoEvent::Miss { .. }) {
                f();
            }
        });
        self
    }

    /// Builds the memoizing layer.
    pub fn build(self) -> crate::MemoLayer<Req, K> {
        crate::MemoLayer::new(MemoConfig {
            key_extractor: self.key_extractor,
            event_listeners: self.event_listeners,
            name: self.name,
        })
    }
}
