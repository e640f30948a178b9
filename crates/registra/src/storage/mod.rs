//! Storage backend implementations.
//!
//! Concrete implementations of the repository traits defined in
//! `registra_core::storage`: the SQLite backend and the cached decorators
//! that wire writes to report-cache invalidation.

pub mod cached;
pub mod sqlite;

pub use sqlite::SqliteRepository;
