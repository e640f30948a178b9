//! Cached repository decorators.
//!
//! These wrap the storage repositories with the behavior that keeps the
//! report cache honest:
//!
//! - **Report reads**: cache-first with lazy fill (cache-aside).
//! - **Writes**: persist, delete displaced attachment files (best-effort),
//!   then invalidate the collection's whole report partition and publish
//!   exactly one mutation notification before returning success.
//!
//! Invalidation goes through one shared routine for every write path, so a
//! new route can never reinvent a partial version of it. Cache failures are
//! logged and never fail the write or block a read from recomputing.

mod appointments;
mod employees;
mod travels;

pub use appointments::CachedAppointmentRepository;
pub use employees::CachedEmployeeRepository;
pub use travels::CachedTravelRepository;

use registra_core::cache::{Cache, MutationBus};
use registra_core::records::Collection;
use registra_core::storage::FileStore;

/// The single post-write step shared by every mutation path: drop the
/// collection's report partition (dependents included, via the cache's
/// dependency table) and notify subscribers once.
pub(crate) async fn invalidate_and_publish<C: Cache>(
    cache: &C,
    mutations: &MutationBus,
    collection: Collection,
) {
    if let Err(err) = cache.invalidate_collection(collection).await {
        tracing::warn!(
            %collection,
            error = %err,
            "Failed to invalidate report cache"
        );
    }
    mutations.publish(collection);
}

/// Deletes a no-longer-owned attachment file. File-system failures are
/// tolerated; the row change already committed.
pub(crate) async fn remove_file_best_effort<F: FileStore + ?Sized>(files: &F, path: &str) {
    if let Err(err) = files.delete(path).await {
        tracing::warn!(path = %path, error = %err, "Failed to delete attachment file");
    }
}
