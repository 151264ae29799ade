//! Result memoization for Tower services.
//!
//! Wraps a referentially pure operation so that a repeated request replays
//! the stored result instead of invoking the operation again. The table has
//! no expiry and no size bound: it is an optimization memo, not a cache for
//! data that changes. Wrapping an impure operation silently returns stale
//! results.
//!
//! Only successful results are stored. Errors pass through unchanged and the
//! next identical request invokes the operation again.
//!
//! # Examples
//!
//! ```
//! use tower_decorate_memo::MemoLayer;
//! use tower::{Layer, Service, ServiceExt};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let memo = MemoLayer::<String>::builder()
//!     .name("lookup")
//!     .on_hit(|| println!("replayed"))
//!     .build();
//!
//! let mut service = memo.layer(tower::service_fn(|req: String| async move {
//!     Ok::<_, std::io::Error>(req.len())
//! }));
//!
//! let first = service.ready().await?.call("hello".to_string()).await?;
//! let second = service.ready().await?.call("hello".to_string()).await?;
//! assert_eq!(first, second);
//! assert_eq!(service.store().len(), 1);
//! # Ok(())
//! # }
//! ```

mod config;
mod events;
mod layer;
mod store;

pub use config::{KeyExtractor, MemoConfig, MemoConfigBuilder};
pub use events::MemoEvent;
pub use layer::{MemoLayer, SharedMemoLayer};
pub use store::MemoStore;

use futures::future::{self, BoxFuture, FutureExt};
use std::hash::Hash;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;
use tower::Service;
use tracing::debug;

#[cfg(feature = "metrics")]
use metrics::{counter, gauge};

/// A Tower [`Service`] that memoizes successful responses.
///
/// Responses must implement `Clone` to be replayed.
pub struct Memoize<S, Req, K, V> {
    inner: S,
    config: Arc<MemoConfig<Req, K>>,
    store: MemoStore<K, V>,
}

impl<S, Req, K, V> Memoize<S, Req, K, V> {
    /// Creates a new `Memoize` service that reads and writes `store`.
    pub fn with_store(inner: S, config: Arc<MemoConfig<Req, K>>, store: MemoStore<K, V>) -> Self {
        Self {
            inner,
            config,
            store,
        }
    }

    /// The table backing this service.
    pub fn store(&self) -> &MemoStore<K, V> {
        &self.store
    }
}

impl<S, Req, K, V> Clone for Memoize<S, Req, K, V>
where
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            config: Arc::clone(&self.config),
            store: self.store.clone(),
        }
    }
}

impl<S, Req, K> Service<Req> for Memoize<S, Req, K, S::Response>
where
    S: Service<Req>,
    S::Future: Send + 'static,
    S::Response: Clone + Send + 'static,
    S::Error: Send + 'static,
    K: Hash + Eq + Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Req) -> Self::Future {
        let key = self.config.key_for(&req);
        let name = &self.config.name;

        if let Some(response) = self.store.get(&key) {
            #[cfg(feature = "metrics")]
            counter!("memo_requests_total", "memo" => name.clone(), "result" => "hit").increment(1);

            debug!(operation = %name, "memo hit");
            self.config.event_listeners.emit(&MemoEvent::Hit {
                operation_name: name.clone(),
                timestamp: Instant::now(),
            });
            return future::ready(Ok(response)).boxed();
        }

        #[cfg(feature = "metrics")]
        counter!("memo_requests_total", "memo" => name.clone(), "result" => "miss").increment(1);

        debug!(operation = %name, "memo miss");
        self.config.event_listeners.emit(&MemoEvent::Miss {
            operation_name: name.clone(),
            timestamp: Instant::now(),
        });

        let future = self.inner.call(req);
        let store = self.store.clone();
        #[cfg(feature = "metrics")]
        let name = name.clone();

        Box::pin(async move {
            let response = future.await?;
            let stored = store.insert_if_absent(key, response);

            #[cfg(feature = "metrics")]
            gauge!("memo_size", "memo" => name).set(store.len() as f64);

            Ok(stored)
        })
    }
}
