use crate::config::MemoConfig;
use crate::store::MemoStore;
use crate::Memoize;
use std::hash::Hash;
use std::sync::Arc;
use tower::{Layer, Service};

/// A Tower [`Layer`] that memoizes the results of the wrapped service.
///
/// Every call to [`Layer::layer`] gets a fresh, private table. Clones of the
/// resulting service share that table. Use [`MemoLayer::shared`] to hand the
/// same table to several services or to reach it from inside the operation.
///
/// # Examples
///
/// ```
/// use tower_decorate_memo::MemoLayer;
/// use tower::ServiceBuilder;
///
/// let memo = MemoLayer::<u64>::builder().name("square").build();
///
/// let service = ServiceBuilder::new()
///     .layer(memo)
///     .service(tower::service_fn(|n: u64| async move { Ok::<_, std::io::Error>(n * n) }));
/// ```
pub struct MemoLayer<Req, K = Req> {
    config: Arc<MemoConfig<Req, K>>,
}

impl<Req> MemoLayer<Req, Req>
where
    Req: Clone + 'static,
{
    /// Creates a new builder keyed by the full request.
    pub fn builder() -> crate::MemoConfigBuilder<Req, Req> {
        crate::MemoConfigBuilder::new()
    }
}

impl<Req, K> MemoLayer<Req, K> {
    pub(crate) fn new(config: MemoConfig<Req, K>) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns the configuration shared by every service this layer wraps.
    pub fn config(&self) -> &MemoConfig<Req, K> {
        &self.config
    }

    /// Returns a layer whose services all read and write `store`.
    pub fn shared<V>(&self, store: MemoStore<K, V>) -> SharedMemoLayer<Req, K, V> {
        SharedMemoLayer {
            config: Arc::clone(&self.config),
            store,
        }
    }
}

impl<Req, K> Clone for MemoLayer<Req, K> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
        }
    }
}

impl<S, Req, K> Layer<S> for MemoLayer<Req, K>
where
    S: Service<Req>,
    S::Response: Clone,
    K: Hash + Eq,
{
    type Service = Memoize<S, Req, K, S::Response>;

    fn layer(&self, service: S) -> Self::Service {
        Memoize::with_store(service, Arc::clone(&self.config), MemoStore::new())
    }
}

/// A memoizing layer bound to an existing [`MemoStore`].
pub struct SharedMemoLayer<Req, K, V> {
    config: Arc<MemoConfig<Req, K>>,
    store: MemoStore<K, V>,
}

impl<Req, K, V> SharedMemoLayer<Req, K, V> {
    /// The table every wrapped service uses.
    pub fn store(&self) -> &MemoStore<K, V> {
        &self.store
    }
}

impl<Req, K, V> Clone for SharedMemoLayer<Req, K, V> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            store: self.store.clone(),
        }
    }
}

impl<S, Req, K, V> Layer<S> for SharedMemoLayer<Req, K, V> {
    type Service = Memoize<S, Req, K, V>;

    fn layer(&self, service: S) -> Self::Service {
        Memoize::with_store(service, Arc::clone(&self.config), self.store.clone())
    }
}
