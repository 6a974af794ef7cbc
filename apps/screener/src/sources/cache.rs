//! Process-lifetime lookup cache for external source fetches.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell};
use tracing::debug;

/// Key → value cache with no expiry and no invalidation: one batch run is
/// short-lived enough that stale entries are an accepted tradeoff.
///
/// Every outcome is cached, including not-found ones, so a known-absent
/// profile costs the network exactly once. Per-key mutual exclusion comes
/// from the `OnceCell`: concurrent callers for the same key agree on a
/// single fetch and share its result.
pub struct LookupCache<V> {
    entries: Mutex<HashMap<String, Arc<OnceCell<V>>>>,
}

impl<V: Clone> LookupCache<V> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached value for `key`, or runs `fetch` to produce,
    /// store, and return it. `fetch` is invoked at most once per key for
    /// the cache's lifetime.
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        let cell = {
            let mut entries = self.entries.lock().await;
            entries
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };

        if let Some(value) = cell.get() {
            debug!(key, "lookup cache hit");
            return value.clone();
        }

        cell.get_or_init(fetch).await.clone()
    }

    /// Number of keys seen so far (fetched or in flight).
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

impl<V: Clone> Default for LookupCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
