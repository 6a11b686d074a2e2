//! Delivery job persistence in `PostgreSQL`.
//!
//! Plain CRUD over the `delivery_jobs` table. `status` is stored as given;
//! no transition rules are enforced here or anywhere else.

use chrono::{DateTime, Utc};
use fleet_types::{DeliveryJob, DeliveryJobUpdate, JobId, NewDeliveryJob};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbError;

const JOB_COLUMNS: &str = "id, title, pickup_zone, dropoff_zone, requested_by, status, \
                           assigned_robot_id, created_at, updated_at";

/// Operations on the `delivery_jobs` table.
#[derive(Clone, Debug)]
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    /// Create a store over `pool`.
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new job with status `pending`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the insert fails.
    pub async fn create(&self, new_job: NewDeliveryJob) -> Result<DeliveryJob, DbError> {
        let job = new_job.into_job(Utc::now());

        let row = sqlx::query_as::<_, JobRow>(&format!(
            "INSERT INTO delivery_jobs ({JOB_COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {JOB_COLUMNS}"
        ))
        .bind(job.id.into_inner())
        .bind(&job.title)
        .bind(&job.pickup_zone)
        .bind(&job.dropoff_zone)
        .bind(&job.requested_by)
        .bind(&job.status)
        .bind(job.assigned_robot_id.as_deref())
        .bind(job.created_at)
        .bind(job.updated_at)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(job_id = %row.id, "Inserted delivery job");
        Ok(row.into())
    }

    /// All jobs, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn list(&self) -> Result<Vec<DeliveryJob>, DbError> {
        let rows = sqlx::query_as::<_, JobRow>(&format!(
            "SELECT {JOB_COLUMNS} FROM delivery_jobs ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(DeliveryJob::from).collect())
    }

    /// One job by id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn get(&self, id: JobId) -> Result<Option<DeliveryJob>, DbError> {
        let row = sqlx::query_as::<_, JobRow>(&format!(
            "SELECT {JOB_COLUMNS} FROM delivery_jobs WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(DeliveryJob::from))
    }

    /// Apply a partial update. `None` if the job does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the update fails.
    pub async fn update(
        &self,
        id: JobId,
        patch: DeliveryJobUpdate,
    ) -> Result<Option<DeliveryJob>, DbError> {
        let row = sqlx::query_as::<_, JobRow>(&format!(
            "UPDATE delivery_jobs
             SET status = COALESCE($2, status),
                 assigned_robot_id = COALESCE($3, assigned_robot_id),
                 updated_at = $4
             WHERE id = $1
             RETURNING {JOB_COLUMNS}"
        ))
        .bind(id.into_inner())
        .bind(patch.status)
        .bind(patch.assigned_robot_id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(DeliveryJob::from))
    }

    /// Delete a job. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the delete fails.
    pub async fn delete(&self, id: JobId) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM delivery_jobs WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// A row from the `delivery_jobs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct JobRow {
    /// Job UUID.
    pub id: Uuid,
    /// Short description.
    pub title: String,
    /// Pickup zone.
    pub pickup_zone: String,
    /// Drop-off zone.
    pub dropoff_zone: String,
    /// Requester.
    pub requested_by: String,
    /// Free-form status.
    pub status: String,
    /// Assigned robot, if any.
    pub assigned_robot_id: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

impl From<JobRow> for DeliveryJob {
    fn from(row: JobRow) -> Self {
        Self {
            id: JobId::from(row.id),
            title: row.title,
            pickup_zone: row.pickup_zone,
            dropoff_zone: row.dropoff_zone,
            requested_by: row.requested_by,
            status: row.status,
            assigned_robot_id: row.assigned_robot_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
