//! Query cache over the gateway

use crate::error::{HubError, HubResult};
use crate::gateway::Gateway;
use crate::model::Product;
use moka::future::Cache;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Logical resources the cache can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// The full product collection (`GET /products`)
    Products,
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::Products => f.write_str("products"),
        }
    }
}

/// Read-through cache with at most one fetch in flight per key
///
/// Entries are keyed by `(key, generation)`. Invalidation bumps the
/// generation, so a fetch started before it can neither be joined nor
/// serve its result to later readers.
#[derive(Clone)]
pub struct QueryCache {
    gateway: Arc<dyn Gateway>,
    entries: Cache<(QueryKey, u64), Arc<Vec<Product>>>,
    generation: Arc<AtomicU64>,
}

impl QueryCache {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            gateway,
            entries: Cache::builder().max_capacity(8).build(),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    fn current(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// The product collection, fetched on first read or after invalidation
    ///
    /// Concurrent readers during a fetch share its result. A failed fetch is
    /// not cached; every waiter receives the error.
    pub async fn get_collection(&self) -> HubResult<Arc<Vec<Product>>> {
        let generation = self.current();
        let entry = (QueryKey::Products, generation);
        let gateway = Arc::clone(&self.gateway);
        let result = self
            .entries
            .try_get_with(entry, async move {
                debug!("Fetching {} (generation {})", QueryKey::Products, generation);
                gateway.list().await.map(Arc::new)
            })
            .await
            .map_err(HubError::from_shared);

        // Invalidated while fetching: this reader keeps its answer, nobody else gets it.
        if self.current() != generation {
            self.entries.invalidate(&entry).await;
        }
        result
    }

    /// Mark `key` stale so the next read refetches
    ///
    /// Fetches already in flight finish for their own callers only.
    pub async fn invalidate(&self, key: QueryKey) {
        let stale = self.generation.fetch_add(1, Ordering::SeqCst);
        self.entries.invalidate(&(key, stale)).await;
        debug!("Invalidated {}", key);
    }

    /// Whether `key` currently holds a fresh value
    pub fn is_cached(&self, key: QueryKey) -> bool {
        self.entries.contains_key(&(key, self.current()))
    }
}
