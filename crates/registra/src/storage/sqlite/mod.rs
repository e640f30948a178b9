//! SQLite storage backend.
//!
//! Implements the repository traits from `registra_core::storage` using
//! `rusqlite` for synchronous operations and `tokio-rusqlite` for async
//! wrapping. Multi-statement operations run inside explicit transactions.

mod conversions;
mod error;
mod repository;
mod schema;

pub use repository::SqliteRepository;
