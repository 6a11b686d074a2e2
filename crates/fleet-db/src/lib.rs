//! Delivery job storage for the fleet operations backend.
//!
//! Jobs are the only persisted data. They live in `PostgreSQL` when a
//! database is configured and in process memory otherwise.
//!
//! # Modules
//!
//! - [`postgres`] -- connection pool, configuration, and migrations
//! - [`job_store`] -- `delivery_jobs` CRUD over `PostgreSQL`
//! - [`memory`] -- in-process job store
//! - [`repository`] -- [`JobRepository`], the store handlers talk to
//! - [`error`] -- shared error type

pub mod error;
pub mod job_store;
pub mod memory;
pub mod postgres;
pub mod repository;

// Re-export primary types for convenience.
pub use error::DbError;
pub use job_store::{JobRow, PgJobStore};
pub use memory::MemoryJobStore;
pub use postgres::{PostgresConfig, PostgresPool};
pub use repository::JobRepository;
