use std::time::Duration;

use async_trait::async_trait;

use crate::records::Collection;

use super::Result;

/// Trait for the report cache.
///
/// Values are opaque bytes; key canonicalization and (de)serialization live
/// in sibling modules so every implementation agrees on them.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Gets a live (non-expired) value from the cache by key.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Sets a value in the cache with an optional TTL.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()>;

    /// Deletes a single value from the cache by key.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Drops every cached report belonging to `collection` or to a collection
    /// that depends on it (see [`super::invalidation_targets`]).
    ///
    /// Implementations must scan the collection's tracked keys rather than
    /// delete a fixed key: report keys embed every filter dimension, so the
    /// live key set for one collection is unbounded.
    async fn invalidate_collection(&self, collection: Collection) -> Result<()>;
}
