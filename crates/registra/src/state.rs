//! Application state with repository-based storage.
//!
//! The state is cloned into every request handler and carries the three
//! cached repositories as trait objects, the attachment file store, and the
//! mutation bus. The report cache itself is owned by the decorators; nothing
//! reaches it ambiently.

use std::path::PathBuf;
use std::sync::Arc;

use registra_core::cache::MutationBus;
use registra_core::storage::{
    AppointmentRepository, EmployeeRepository, FileStore, TravelRepository,
};

use crate::cache::MemoryCache;
use crate::config::Config;
use crate::files::DiskFileStore;
use crate::storage::cached::{
    CachedAppointmentRepository, CachedEmployeeRepository, CachedTravelRepository,
};
use crate::storage::SqliteRepository;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Employee repository (cached decorator over SQLite).
    pub employees: Arc<dyn EmployeeRepository>,
    /// Travel repository (cached decorator over SQLite).
    pub travels: Arc<dyn TravelRepository>,
    /// Appointment repository (cached decorator over SQLite).
    pub appointments: Arc<dyn AppointmentRepository>,
    /// Attachment file store.
    pub files: Arc<dyn FileStore>,
    /// Mutation notification bus.
    pub mutations: MutationBus,
    /// Attachment size limit enforced on uploads.
    pub max_attachment_bytes: usize,
    /// Directory the router serves attachments from.
    pub uploads_dir: PathBuf,
}

impl AppState {
    /// Creates the state: SQLite storage, one in-memory report cache shared
    /// by the decorators, and a disk file store.
    pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
        let sqlite_repo = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);
        let memory_cache = Arc::new(MemoryCache::new(config.cache_max_entries));
        let file_store = Arc::new(DiskFileStore::new(&config.uploads_dir));
        let mutations = MutationBus::new();

        let employees = Arc::new(CachedEmployeeRepository::new(
            sqlite_repo.clone(),
            memory_cache.clone(),
            mutations.clone(),
        ));
        let travels = Arc::new(CachedTravelRepository::new(
            sqlite_repo.clone(),
            memory_cache.clone(),
            file_store.clone(),
            mutations.clone(),
            config.cache_ttl(),
        ));
        let appointments = Arc::new(CachedAppointmentRepository::new(
            sqlite_repo,
            memory_cache,
            file_store.clone(),
            mutations.clone(),
            config.cache_ttl(),
        ));

        Ok(Self {
            employees,
            travels,
            appointments,
            files: file_store,
            mutations,
            max_attachment_bytes: config.max_attachment_bytes,
            uploads_dir: PathBuf::from(&config.uploads_dir),
        })
    }
}
