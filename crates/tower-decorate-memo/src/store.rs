//! The memo table.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A shared, unbounded table of memoized results.
///
/// Clones share the same table. Entries are written once and never replaced
/// or evicted: the wrapped operation is assumed to be pure, so the first
/// result stored for a key stays valid for the lifetime of the table.
///
/// The table is also the hook for recursive definitions: an operation that
/// calls itself can reach the same entries through a clone of the store (or
/// through a clone of the memoized service that owns it).
pub struct MemoStore<K, V> {
    entries: Arc<Mutex<HashMap<K, V>>>,
}

impl<K, V> Clone for MemoStore<K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<K, V> Default for MemoStore<K, V> {
    fn default() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<K, V> fmt::Debug for MemoStore<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("MemoStore").field("len", &len).finish()
    }
}

impl<K, V> MemoStore<K, V>
where
    K: Hash + Eq,
    V: Clone,
{
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, V>> {
        // Entries are never left half-written, so a poisoned table is still usable.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the stored result for `key`, if any.
    pub fn get(&self, key: &K) -> Option<V> {
        self.lock().get(key).cloned()
    }

    /// Returns true if a result is stored for `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.lock().contains_key(key)
    }

    /// Stores `value` unless the key already has an entry, and returns the
    /// entry that is in the table afterwards.
    ///
    /// When two callers race on the same key the first write wins and both
    /// observe it.
    pub fn insert_if_absent(&self, key: K, value: V) -> V {
        self.lock().entry(key).or_insert(value).clone()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nothing has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Returns the stored result for `key`, computing and storing it first if
    /// it is missing.
    ///
    /// The lock is not held while `compute` runs, so `compute` may itself
    /// call back into this store (recursion) and concurrent callers with the
    /// same missing key may compute it more than once. Errors are returned
    /// without being stored.
    pub async fn get_or_compute<F, Fut, E>(&self, key: K, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }
        let value = compute().await?;
        Ok(self.insert_if_absent(key, value))
    }
}
