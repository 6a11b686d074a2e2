//! In-process delivery job store.
//!
//! Used when no database URL is configured and by the API tests. Contents
//! are lost on restart.

use std::collections::BTreeMap;

use chrono::Utc;
use fleet_types::{DeliveryJob, DeliveryJobUpdate, JobId, NewDeliveryJob};
use tokio::sync::RwLock;

/// Delivery jobs held in memory.
#[derive(Debug, Default)]
pub struct MemoryJobStore {
    jobs: RwLock<BTreeMap<JobId, DeliveryJob>>,
}

impl MemoryJobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new job with status `pending`.
    pub async fn create(&self, new_job: NewDeliveryJob) -> DeliveryJob {
        let job = new_job.into_job(Utc::now());
        self.jobs.write().await.insert(job.id, job.clone());
        job
    }

    /// All jobs, newest first.
    pub async fn list(&self) -> Vec<DeliveryJob> {
        let mut jobs: Vec<DeliveryJob> = self.jobs.read().await.values().cloned().collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        jobs
    }

    /// One job by id.
    pub async fn get(&self, id: JobId) -> Option<DeliveryJob> {
        self.jobs.read().await.get(&id).cloned()
    }

    /// Apply a partial update. `None` if the job does not exist.
    pub async fn update(&self, id: JobId, patch: DeliveryJobUpdate) -> Option<DeliveryJob> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(&id)?;
        patch.apply(job, Utc::now());
        Some(job.clone())
    }

    /// Delete a job. Returns whether it existed.
    pub async fn delete(&self, id: JobId) -> bool {
        self.jobs.write().await.remove(&id).is_some()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn new_job(title: &str) -> NewDeliveryJob {
        NewDeliveryJob {
            title: title.to_owned(),
            pickup_zone: String::from("dock"),
            dropoff_zone: String::from("ward-3"),
            requested_by: String::from("ops"),
            assigned_robot_id: None,
        }
    }

    #[tokio::test]
    async fn create_then_get() {
        let store = MemoryJobStore::new();
        let job = store.create(new_job("linen")).await;
        assert_eq!(job.status, "pending");
        assert_eq!(store.get(job.id).await, Some(job));
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = MemoryJobStore::new();
        let first = store.create(new_job("first")).await;
        let second = store.create(new_job("second")).await;
        let listed: Vec<JobId> = store.list().await.into_iter().map(|j| j.id).collect();
        assert_eq!(listed, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn update_missing_job_is_none() {
        let store = MemoryJobStore::new();
        assert!(store
            .update(JobId::new(), DeliveryJobUpdate::default())
            .await
            .is_none());
    }

    #[tokio::test]
    async fn update_applies_patch() {
        let store = MemoryJobStore::new();
        let job = store.create(new_job("meds")).await;
        let patch = DeliveryJobUpdate {
            status: Some(String::from("in_transit")),
            assigned_robot_id: Some(String::from("r2")),
        };
        let updated = store.update(job.id, patch).await.unwrap();
        assert_eq!(updated.status, "in_transit");
        assert_eq!(updated.assigned_robot_id.as_deref(), Some("r2"));
        assert!(updated.updated_at >= job.updated_at);
        assert_eq!(store.get(job.id).await, Some(updated));
    }

    #[tokio::test]
    async fn delete_reports_existence() {
        let store = MemoryJobStore::new();
        let job = store.create(new_job("x")).await;
        assert!(store.delete(job.id).await);
        assert!(!store.delete(job.id).await);
        assert!(store.get(job.id).await.is_none());
    }
}
