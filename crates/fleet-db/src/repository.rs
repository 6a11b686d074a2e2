//! Backend-agnostic delivery job access.
//!
//! Handlers hold a [`JobRepository`] and never care which store is behind
//! it. `PostgreSQL` is used whenever a database URL is configured.

use std::sync::Arc;

use fleet_types::{DeliveryJob, DeliveryJobUpdate, JobId, NewDeliveryJob};

use crate::error::DbError;
use crate::job_store::PgJobStore;
use crate::memory::MemoryJobStore;

/// Delivery job store selected at startup.
#[derive(Clone, Debug)]
pub enum JobRepository {
    /// Persistent store.
    Postgres(PgJobStore),
    /// Volatile store.
    Memory(Arc<MemoryJobStore>),
}

impl JobRepository {
    /// A fresh, empty in-memory repository.
    pub fn in_memory() -> Self {
        Self::Memory(Arc::new(MemoryJobStore::new()))
    }

    /// Short backend name for logs and health output.
    pub const fn backend(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }

    /// Create a job.
    ///
    /// # Errors
    ///
    /// Propagates [`DbError`] from the `PostgreSQL` store.
    pub async fn create(&self, new_job: NewDeliveryJob) -> Result<DeliveryJob, DbError> {
        match self {
            Self::Postgres(store) => store.create(new_job).await,
            Self::Memory(store) => Ok(store.create(new_job).await),
        }
    }

    /// List jobs, newest first.
    ///
    /// # Errors
    ///
    /// Propagates [`DbError`] from the `PostgreSQL` store.
    pub async fn list(&self) -> Result<Vec<DeliveryJob>, DbError> {
        match self {
            Self::Postgres(store) => store.list().await,
            Self::Memory(store) => Ok(store.list().await),
        }
    }

    /// Fetch one job.
    ///
    /// # Errors
    ///
    /// Propagates [`DbError`] from the `PostgreSQL` store.
    pub async fn get(&self, id: JobId) -> Result<Option<DeliveryJob>, DbError> {
        match self {
            Self::Postgres(store) => store.get(id).await,
            Self::Memory(store) => Ok(store.get(id).await),
        }
    }

    /// Update one job.
    ///
    /// # Errors
    ///
    /// Propagates [`DbError`] from the `PostgreSQL` store.
    pub async fn update(
        &self,
        id: JobId,
        patch: DeliveryJobUpdate,
    ) -> Result<Option<DeliveryJob>, DbError> {
        match self {
            Self::Postgres(store) => store.update(id, patch).await,
            Self::Memory(store) => Ok(store.update(id, patch).await),
        }
    }

    /// Delete one job.
    ///
    /// # Errors
    ///
    /// Propagates [`DbError`] from the `PostgreSQL` store.
    pub async fn delete(&self, id: JobId) -> Result<bool, DbError> {
        match self {
            Self::Postgres(store) => store.delete(id).await,
            Self::Memory(store) => Ok(store.delete(id).await),
        }
    }
}

impl From<PgJobStore> for JobRepository {
    fn from(store: PgJobStore) -> Self {
        Self::Postgres(store)
    }
}
