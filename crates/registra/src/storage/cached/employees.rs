//! Cached employee repository decorator.
//!
//! Employees have no report endpoint of their own, but travel reports filter
//! by employee id, so every employee write still goes through the shared
//! invalidation routine; the dependency table routes it to the travels
//! partition.

use std::sync::Arc;

use async_trait::async_trait;

use registra_core::cache::{Cache, MutationBus};
use registra_core::records::{Collection, Employee, NewEmployee};
use registra_core::storage::{BulkOutcome, EmployeeRepository, Result, UpsertOutcome};

use super::invalidate_and_publish;

/// Wraps an [`EmployeeRepository`] with write-coupled invalidation.
pub struct CachedEmployeeRepository<R, C>
where
    R: EmployeeRepository,
    C: Cache,
{
    repository: Arc<R>,
    cache: Arc<C>,
    mutations: MutationBus,
}

impl<R, C> CachedEmployeeRepository<R, C>
where
    R: EmployeeRepository,
    C: Cache,
{
    pub fn new(repository: Arc<R>, cache: Arc<C>, mutations: MutationBus) -> Self {
        Self {
            repository,
            cache,
            mutations,
        }
    }

    async fn written(&self) {
        invalidate_and_publish(self.cache.as_ref(), &self.mutations, Collection::Employees).await;
    }
}

#[async_trait]
impl<R, C> EmployeeRepository for CachedEmployeeRepository<R, C>
where
    R: EmployeeRepository + 'static,
    C: Cache + 'static,
{
    async fn list_employees(&self) -> Result<Vec<Employee>> {
        self.repository.list_employees().await
    }

    async fn create_employee(&self, employee: &NewEmployee) -> Result<UpsertOutcome> {
        let outcome = self.repository.create_employee(employee).await?;

        self.written().await;
        tracing::debug!(inserted = outcome.inserted, "Employee upserted");
        Ok(outcome)
    }

    async fn delete_employee(&self, id: i64) -> Result<()> {
        self.repository.delete_employee(id).await?;

        self.written().await;
        tracing::debug!(employee_id = id, "Employee deleted");
        Ok(())
    }

    async fn bulk_upsert_employees(&self, rows: &[NewEmployee]) -> Result<BulkOutcome> {
        let outcome = self.repository.bulk_upsert_employees(rows).await?;

        self.written().await;
        tracing::debug!(
            affected = outcome.affected,
            skipped = outcome.skipped,
            "Employee sheet ingested"
        );
        Ok(outcome)
    }
}
