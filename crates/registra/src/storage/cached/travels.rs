//! Cached travel-authority repository decorator.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use registra_core::cache::{
    deserialize_report, report_key, serialize_report, Cache, MutationBus,
};
use registra_core::records::{Collection, NewTravel, TravelAuthority};
use registra_core::report::{Granularity, GraphResponse, ReportRequest, TravelGraphFilter};
use registra_core::storage::{
    BatchDelete, BulkOutcome, FileStore, Result, SelectiveDelete, TravelListFilter,
    TravelRepository,
};

use super::{invalidate_and_publish, remove_file_best_effort};

/// Wraps a [`TravelRepository`] with report caching and write-coupled
/// invalidation.
///
/// # Type Parameters
///
/// * `R` - The underlying repository implementation
/// * `C` - The cache implementation
/// * `F` - The attachment file store
pub struct CachedTravelRepository<R, C, F>
where
    R: TravelRepository,
    C: Cache,
    F: FileStore,
{
    repository: Arc<R>,
    cache: Arc<C>,
    files: Arc<F>,
    mutations: MutationBus,
    ttl: Duration,
}

impl<R, C, F> CachedTravelRepository<R, C, F>
where
    R: TravelRepository,
    C: Cache,
    F: FileStore,
{
    pub fn new(
        repository: Arc<R>,
        cache: Arc<C>,
        files: Arc<F>,
        mutations: MutationBus,
        ttl: Duration,
    ) -> Self {
        Self {
            repository,
            cache,
            files,
            mutations,
            ttl,
        }
    }

    async fn written(&self) {
        invalidate_and_publish(self.cache.as_ref(), &self.mutations, Collection::Travels).await;
    }
}

#[async_trait]
impl<R, C, F> TravelRepository for CachedTravelRepository<R, C, F>
where
    R: TravelRepository + 'static,
    C: Cache + 'static,
    F: FileStore + 'static,
{
    async fn list_travels(&self) -> Result<Vec<TravelAuthority>> {
        self.repository.list_travels().await
    }

    async fn filter_travels(&self, filter: &TravelListFilter) -> Result<Vec<TravelAuthority>> {
        self.repository.filter_travels(filter).await
    }

    async fn create_travel(&self, travel: &NewTravel, attachment: Option<&str>) -> Result<i64> {
        let id = self.repository.create_travel(travel, attachment).await?;

        self.written().await;
        tracing::debug!(travel_id = id, "Travel authority created");
        Ok(id)
    }

    async fn update_travel(
        &self,
        id: i64,
        travel: &NewTravel,
        attachment: Option<&str>,
    ) -> Result<Option<String>> {
        let replaced = self.repository.update_travel(id, travel, attachment).await?;

        // The new association is committed; the displaced file can go.
        if let Some(old) = &replaced {
            remove_file_best_effort(self.files.as_ref(), old).await;
        }

        self.written().await;
        tracing::debug!(travel_id = id, "Travel authority updated");
        Ok(replaced)
    }

    async fn delete_travel(&self, id: i64) -> Result<Option<String>> {
        let prior = self.repository.delete_travel(id).await?;

        if let Some(path) = &prior {
            remove_file_best_effort(self.files.as_ref(), path).await;
        }

        self.written().await;
        tracing::debug!(travel_id = id, "Travel authority deleted");
        Ok(prior)
    }

    async fn selective_delete_travels(&self, filter: &SelectiveDelete) -> Result<BatchDelete> {
        let outcome = self.repository.selective_delete_travels(filter).await?;

        for path in &outcome.attachments {
            remove_file_best_effort(self.files.as_ref(), path).await;
        }

        // One notification for the whole batch, not one per row
        self.written().await;
        tracing::debug!(deleted = outcome.deleted, "Travel authorities deleted");
        Ok(outcome)
    }

    async fn bulk_insert_travels(&self, rows: &[NewTravel], replace: bool) -> Result<BulkOutcome> {
        let outcome = self.repository.bulk_insert_travels(rows, replace).await?;

        self.written().await;
        tracing::debug!(
            affected = outcome.affected,
            skipped = outcome.skipped,
            replace,
            "Travel authorities bulk loaded"
        );
        Ok(outcome)
    }

    async fn sheet_upsert_travels(&self, rows: &[NewTravel]) -> Result<BulkOutcome> {
        let outcome = self.repository.sheet_upsert_travels(rows).await?;

        self.written().await;
        tracing::debug!(affected = outcome.affected, "Travel sheet ingested");
        Ok(outcome)
    }

    async fn travel_graph(
        &self,
        granularity: Granularity,
        filter: &TravelGraphFilter,
    ) -> Result<GraphResponse> {
        let cache_key = report_key(&ReportRequest::travels(granularity, filter));

        if let Ok(Some(bytes)) = self.cache.get(&cache_key).await {
            if let Ok(response) = deserialize_report(&bytes) {
                tracing::trace!(key = %cache_key, "Report cache hit");
                return Ok(response);
            }
            // Deserialization failed - treat as cache miss
            tracing::warn!(key = %cache_key, "Cached report deserialization failed");
        }

        tracing::trace!(key = %cache_key, "Report cache miss");
        let response = self.repository.travel_graph(granularity, filter).await?;

        if let Ok(bytes) = serialize_report(&response) {
            if let Err(err) = self.cache.set(&cache_key, &bytes, Some(self.ttl)).await {
                tracing::warn!(key = %cache_key, error = %err, "Failed to cache report");
            }
        }

        Ok(response)
    }
}
