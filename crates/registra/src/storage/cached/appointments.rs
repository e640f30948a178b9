//! Cached appointment repository decorator.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use registra_core::cache::{
    deserialize_report, report_key, serialize_report, Cache, MutationBus,
};
use registra_core::records::{Appointment, Collection, NewAppointment};
use registra_core::report::{AppointmentGraphFilter, Granularity, GraphResponse, ReportRequest};
use registra_core::storage::{
    AppointmentRepository, BatchDelete, BulkOutcome, FileStore, Result, SelectiveDelete,
};

use super::{invalidate_and_publish, remove_file_best_effort};

/// Wraps an [`AppointmentRepository`] with report caching and write-coupled
/// invalidation. Same contract as the travel decorator: every successful
/// write path, including the attachment-only update, invalidates the
/// collection partition and publishes one notification.
pub struct CachedAppointmentRepository<R, C, F>
where
    R: AppointmentRepository,
    C: Cache,
    F: FileStore,
{
    repository: Arc<R>,
    cache: Arc<C>,
    files: Arc<F>,
    mutations: MutationBus,
    ttl: Duration,
}

impl<R, C, F> CachedAppointmentRepository<R, C, F>
where
    R: AppointmentRepository,
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
        invalidate_and_publish(
            self.cache.as_ref(),
            &self.mutations,
            Collection::Appointments,
        )
        .await;
    }
}

#[async_trait]
impl<R, C, F> AppointmentRepository for CachedAppointmentRepository<R, C, F>
where
    R: AppointmentRepository + 'static,
    C: Cache + 'static,
    F: FileStore + 'static,
{
    async fn list_appointments(&self) -> Result<Vec<Appointment>> {
        self.repository.list_appointments().await
    }

    async fn create_appointment(
        &self,
        appointment: &NewAppointment,
        attachment: Option<&str>,
    ) -> Result<i64> {
        let id = self
            .repository
            .create_appointment(appointment, attachment)
            .await?;

        self.written().await;
        tracing::debug!(appointment_id = id, "Appointment created");
        Ok(id)
    }

    async fn update_appointment(
        &self,
        id: i64,
        appointment: &NewAppointment,
        attachment: Option<&str>,
    ) -> Result<Option<String>> {
        let replaced = self
            .repository
            .update_appointment(id, appointment, attachment)
            .await?;

        if let Some(old) = &replaced {
            remove_file_best_effort(self.files.as_ref(), old).await;
        }

        self.written().await;
        tracing::debug!(appointment_id = id, "Appointment updated");
        Ok(replaced)
    }

    async fn delete_appointment(&self, id: i64) -> Result<Option<String>> {
        let prior = self.repository.delete_appointment(id).await?;

        if let Some(path) = &prior {
            remove_file_best_effort(self.files.as_ref(), path).await;
        }

        self.written().await;
        tracing::debug!(appointment_id = id, "Appointment deleted");
        Ok(prior)
    }

    async fn selective_delete_appointments(
        &self,
        filter: &SelectiveDelete,
    ) -> Result<BatchDelete> {
        let outcome = self
            .repository
            .selective_delete_appointments(filter)
            .await?;

        for path in &outcome.attachments {
            remove_file_best_effort(self.files.as_ref(), path).await;
        }

        self.written().await;
        tracing::debug!(deleted = outcome.deleted, "Appointments deleted");
        Ok(outcome)
    }

    async fn bulk_insert_appointments(&self, rows: &[NewAppointment]) -> Result<BulkOutcome> {
        let outcome = self.repository.bulk_insert_appointments(rows).await?;

        self.written().await;
        tracing::debug!(
            affected = outcome.affected,
            skipped = outcome.skipped,
            "Appointments bulk loaded"
        );
        Ok(outcome)
    }

    async fn set_appointment_attachment(&self, id: i64, path: &str) -> Result<Option<String>> {
        let replaced = self.repository.set_appointment_attachment(id, path).await?;

        if let Some(old) = &replaced {
            remove_file_best_effort(self.files.as_ref(), old).await;
        }

        // Attachment-only updates mutate the collection too
        self.written().await;
        tracing::debug!(appointment_id = id, "Appointment attachment stored");
        Ok(replaced)
    }

    async fn appointment_graph(
        &self,
        granularity: Granularity,
        filter: &AppointmentGraphFilter,
    ) -> Result<GraphResponse> {
        let cache_key = report_key(&ReportRequest::appointments(granularity, filter));

        if let Ok(Some(bytes)) = self.cache.get(&cache_key).await {
            if let Ok(response) = deserialize_report(&bytes) {
                tracing::trace!(key = %cache_key, "Report cache hit");
                return Ok(response);
            }
            tracing::warn!(key = %cache_key, "Cached report deserialization failed");
        }

        tracing::trace!(key = %cache_key, "Report cache miss");
        let response = self
            .repository
            .appointment_graph(granularity, filter)
            .await?;

        if let Ok(bytes) = serialize_report(&response) {
            if let Err(err) = self.cache.set(&cache_key, &bytes, Some(self.ttl)).await {
                tracing::warn!(key = %cache_key, error = %err, "Failed to cache report");
            }
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::RwLock;

    use chrono::NaiveDate;
    use registra_core::storage::RepositoryError;

    use crate::cache::MemoryCache;

    struct MockAppointmentRepository {
        appointments: RwLock<HashMap<i64, Appointment>>,
        graph_calls: AtomicUsize,
    }

    impl MockAppointmentRepository {
        fn new() -> Self {
            Self {
                appointments: RwLock::new(HashMap::new()),
                graph_calls: AtomicUsize::new(0),
            }
        }
    }

    fn stored(id: i64, appointment: &NewAppointment, attachment: Option<&str>) -> Appointment {
        Appointment {
            id,
            name: appointment.name.clone(),
            position_title: appointment.position_title.clone(),
            status: appointment.status.clone(),
            school_office: appointment.school_office.clone(),
            nature: appointment.nature.clone(),
            item_no: appointment.item_no.clone(),
            date_signed: appointment.date_signed,
            attachment: attachment.map(str::to_string),
        }
    }

    #[async_trait]
    impl AppointmentRepository for MockAppointmentRepository {
        async fn list_appointments(&self) -> Result<Vec<Appointment>> {
            Ok(self.appointments.read().await.values().cloned().collect())
        }

        async fn create_appointment(
            &self,
            appointment: &NewAppointment,
            attachment: Option<&str>,
        ) -> Result<i64> {
            let mut appointments = self.appointments.write().await;
            let id = appointments.len() as i64 + 1;
            appointments.insert(id, stored(id, appointment, attachment));
            Ok(id)
        }

        async fn update_appointment(
            &self,
            id: i64,
            appointment: &NewAppointment,
            attachment: Option<&str>,
        ) -> Result<Option<String>> {
            let mut appointments = self.appointments.write().await;
            let existing = appointments
                .get(&id)
                .cloned()
                .ok_or(RepositoryError::NotFound {
                    entity_type: "Appointment",
                    id: id.to_string(),
                })?;
            let old = existing.attachment.clone();
            let kept = attachment.map(str::to_string).or_else(|| old.clone());
            appointments.insert(id, stored(id, appointment, kept.as_deref()));
            Ok(match (attachment, old) {
                (Some(_), Some(old)) => Some(old),
                _ => None,
            })
        }

        async fn delete_appointment(&self, id: i64) -> Result<Option<String>> {
            let mut appointments = self.appointments.write().await;
            let existing = appointments.remove(&id).ok_or(RepositoryError::NotFound {
                entity_type: "Appointment",
                id: id.to_string(),
            })?;
            Ok(existing.attachment)
        }

        async fn selective_delete_appointments(
            &self,
            filter: &SelectiveDelete,
        ) -> Result<BatchDelete> {
            let mut appointments = self.appointments.write().await;
            let ids: Vec<i64> = filter.ids.clone().unwrap_or_default();
            let mut attachments = Vec::new();
            let mut deleted = 0;
            for id in ids {
                if let Some(appointment) = appointments.remove(&id) {
                    deleted += 1;
                    attachments.extend(appointment.attachment);
                }
            }
            if deleted == 0 {
                return Err(RepositoryError::NotFound {
                    entity_type: "Appointment",
                    id: "selection".to_string(),
                });
            }
            Ok(BatchDelete {
                deleted,
                attachments,
            })
        }

        async fn bulk_insert_appointments(&self, rows: &[NewAppointment]) -> Result<BulkOutcome> {
            for row in rows {
                self.create_appointment(row, None).await?;
            }
            Ok(BulkOutcome {
                affected: rows.len() as u64,
                skipped: 0,
            })
        }

        async fn set_appointment_attachment(&self, id: i64, path: &str) -> Result<Option<String>> {
            let mut appointments = self.appointments.write().await;
            let existing = appointments.get_mut(&id).ok_or(RepositoryError::NotFound {
                entity_type: "Appointment",
                id: id.to_string(),
            })?;
            let old = existing.attachment.replace(path.to_string());
            Ok(old)
        }

        async fn appointment_graph(
            &self,
            granularity: Granularity,
            _filter: &AppointmentGraphFilter,
        ) -> Result<GraphResponse> {
            self.graph_calls.fetch_add(1, Ordering::SeqCst);
            Ok(GraphResponse::from_buckets(
                format!("Appointments by {granularity}"),
                vec![("2024".to_string(), 2)],
            ))
        }
    }

    struct MockFileStore {
        deleted: RwLock<Vec<String>>,
    }

    #[async_trait]
    impl FileStore for MockFileStore {
        async fn save(&self, original_name: &str, _bytes: &[u8]) -> Result<String> {
            Ok(format!("/uploads/{original_name}"))
        }

        async fn delete(&self, path: &str) -> Result<()> {
            self.deleted.write().await.push(path.to_string());
            Ok(())
        }
    }

    fn new_appointment(name: &str) -> NewAppointment {
        NewAppointment {
            name: name.to_string(),
            position_title: "Teacher I".to_string(),
            status: "Scheduled".to_string(),
            school_office: "Central ES".to_string(),
            nature: String::new(),
            item_no: String::new(),
            date_signed: NaiveDate::from_ymd_opt(2024, 6, 1),
        }
    }

    fn fixture() -> (
        CachedAppointmentRepository<MockAppointmentRepository, MemoryCache, MockFileStore>,
        Arc<MockAppointmentRepository>,
        Arc<MockFileStore>,
        MutationBus,
    ) {
        let repo = Arc::new(MockAppointmentRepository::new());
        let files = Arc::new(MockFileStore {
            deleted: RwLock::new(Vec::new()),
        });
        let mutations = MutationBus::new();
        let cached = CachedAppointmentRepository::new(
            repo.clone(),
            Arc::new(MemoryCache::new(1000)),
            files.clone(),
            mutations.clone(),
            Duration::from_secs(600),
        );
        (cached, repo, files, mutations)
    }

    #[tokio::test]
    async fn test_graph_is_cached_until_write() {
        let (cached, repo, _files, _mutations) = fixture();
        let filter = AppointmentGraphFilter::default();

        cached
            .appointment_graph(Granularity::Year, &filter)
            .await
            .unwrap();
        cached
            .appointment_graph(Granularity::Year, &filter)
            .await
            .unwrap();
        assert_eq!(repo.graph_calls.load(Ordering::SeqCst), 1);

        cached
            .create_appointment(&new_appointment("Alice Brown"), None)
            .await
            .unwrap();

        cached
            .appointment_graph(Granularity::Year, &filter)
            .await
            .unwrap();
        assert_eq!(repo.graph_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_set_attachment_invalidates_and_deletes_old_file() {
        let (cached, repo, files, mutations) = fixture();
        let mut receiver = mutations.subscribe();

        let id = cached
            .create_appointment(&new_appointment("Alice Brown"), Some("/uploads/old.pdf"))
            .await
            .unwrap();
        cached
            .appointment_graph(Granularity::Year, &AppointmentGraphFilter::default())
            .await
            .unwrap();

        let replaced = cached
            .set_appointment_attachment(id, "/uploads/new.pdf")
            .await
            .unwrap();
        assert_eq!(replaced, Some("/uploads/old.pdf".to_string()));
        assert_eq!(
            *files.deleted.read().await,
            vec!["/uploads/old.pdf".to_string()]
        );

        // The attachment-only write stales the report cache too
        cached
            .appointment_graph(Granularity::Year, &AppointmentGraphFilter::default())
            .await
            .unwrap();
        assert_eq!(repo.graph_calls.load(Ordering::SeqCst), 2);

        // create + set_attachment: two notifications
        assert_eq!(receiver.recv().await.unwrap(), Collection::Appointments);
        assert_eq!(receiver.recv().await.unwrap(), Collection::Appointments);
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_selective_delete_cleans_up_attachments() {
        let (cached, _repo, files, _mutations) = fixture();

        cached
            .create_appointment(&new_appointment("Alice Brown"), Some("/uploads/a.pdf"))
            .await
            .unwrap();
        cached
            .create_appointment(&new_appointment("Carol Diaz"), None)
            .await
            .unwrap();

        let outcome = cached
            .selective_delete_appointments(&SelectiveDelete {
                ids: Some(vec![1, 2]),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(outcome.deleted, 2);
        assert_eq!(
            *files.deleted.read().await,
            vec!["/uploads/a.pdf".to_string()]
        );
    }
}
