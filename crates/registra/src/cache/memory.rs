//! In-memory report cache with LRU eviction and TTL.
//!
//! Report keys are tracked per collection so invalidation can drop exactly
//! one collection's partition (every live key for that collection, however
//! many filter combinations are cached) instead of guessing at fixed keys.
//! Expired entries are reaped lazily on access.

use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::RwLock;

use registra_core::cache::{
    collection_from_key, invalidation_targets, is_report_key, Cache, Result,
};
use registra_core::records::Collection;

/// A single cache entry with optional expiration.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn new(value: Vec<u8>, ttl: Option<Duration>) -> Self {
        let expires_at = ttl.map(|d| Instant::now() + d);
        Self { value, expires_at }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Instant::now() > exp)
    }
}

/// In-memory report cache with LRU eviction.
///
/// Thread-safe via `Arc<RwLock<LruCache>>`. Report keys are indexed by their
/// collection tag; `invalidate_collection` consults the cross-collection
/// dependency table and drops every tracked key of every affected
/// collection.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    /// Main key-value store with LRU eviction.
    store: Arc<RwLock<LruCache<String, CacheEntry>>>,
    /// Tracks report keys by collection for exact partition invalidation.
    tracking: Arc<RwLock<HashMap<Collection, HashSet<String>>>>,
}

impl MemoryCache {
    /// Creates a new cache holding at most `max_entries` values.
    ///
    /// # Panics
    ///
    /// Panics if `max_entries` is 0.
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).expect("max_entries must be > 0");
        Self {
            store: Arc::new(RwLock::new(LruCache::new(capacity))),
            tracking: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    async fn untrack(&self, key: &str) {
        if let Some(collection) = collection_from_key(key) {
            let mut tracking = self.tracking.write().await;
            if let Some(keys) = tracking.get_mut(&collection) {
                keys.remove(key);
                if keys.is_empty() {
                    tracking.remove(&collection);
                }
            }
        }
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut store = self.store.write().await;

        let expired = matches!(store.get(key), Some(entry) if entry.is_expired());
        if expired {
            // Expired: structurally present, logically absent. Reap it now
            // so the entry cannot shadow a later repopulation.
            store.pop(key);
            drop(store);
            self.untrack(key).await;
            return Ok(None);
        }

        Ok(store.get(key).map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        {
            let mut store = self.store.write().await;
            let entry = CacheEntry::new(value.to_vec(), ttl);
            store.put(key.to_string(), entry);
        }

        // Track report keys under their collection tag for invalidation
        if is_report_key(key) {
            if let Some(collection) = collection_from_key(key) {
                let mut tracking = self.tracking.write().await;
                tracking
                    .entry(collection)
                    .or_default()
                    .insert(key.to_string());
            }
        }

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        {
            let mut store = self.store.write().await;
            store.pop(key);
        }
        self.untrack(key).await;
        Ok(())
    }

    async fn invalidate_collection(&self, collection: Collection) -> Result<()> {
        for target in invalidation_targets(collection) {
            let tracked_keys = {
                let mut tracking = self.tracking.write().await;
                tracking.remove(target).unwrap_or_default()
            };

            if tracked_keys.is_empty() {
                continue;
            }

            let mut store = self.store.write().await;
            for key in &tracked_keys {
                store.pop(key);
            }

            tracing::debug!(
                collection = %target,
                keys = tracked_keys.len(),
                "Invalidated report cache partition"
            );
        }

        Ok(())
    }
}
