//! Delivery job records.
//!
//! Jobs are plain persisted rows. `status` is free text: no lifecycle or
//! transition rules are enforced anywhere in the backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::JobId;

/// Status assigned to newly created jobs.
pub const DEFAULT_JOB_STATUS: &str = "pending";

/// A stored delivery job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DeliveryJob {
    /// Server-generated job identifier.
    pub id: JobId,
    /// Short description of the delivery.
    pub title: String,
    /// Zone the robot picks the parcel up from.
    pub pickup_zone: String,
    /// Zone the robot drops the parcel off at.
    pub dropoff_zone: String,
    /// Who asked for the delivery. Also the notification recipient.
    pub requested_by: String,
    /// Current job status.
    pub status: String,
    /// Robot assigned to the job, if any.
    pub assigned_robot_id: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a delivery job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NewDeliveryJob {
    /// Short description of the delivery.
    pub title: String,
    /// Pickup zone.
    pub pickup_zone: String,
    /// Drop-off zone.
    pub dropoff_zone: String,
    /// Requester.
    pub requested_by: String,
    /// Optional robot to assign up front.
    #[serde(default)]
    pub assigned_robot_id: Option<String>,
}

impl NewDeliveryJob {
    /// Materialize a full job record with a fresh id and timestamps.
    pub fn into_job(self, now: DateTime<Utc>) -> DeliveryJob {
        DeliveryJob {
            id: JobId::new(),
            title: self.title,
            pickup_zone: self.pickup_zone,
            dropoff_zone: self.dropoff_zone,
            requested_by: self.requested_by,
            status: DEFAULT_JOB_STATUS.to_owned(),
            assigned_robot_id: self.assigned_robot_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for a delivery job. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DeliveryJobUpdate {
    /// New status.
    #[serde(default)]
    pub status: Option<String>,
    /// New assigned robot.
    #[serde(default)]
    pub assigned_robot_id: Option<String>,
}

impl DeliveryJobUpdate {
    /// Apply the present fields to `job` and bump `updated_at`.
    pub fn apply(self, job: &mut DeliveryJob, now: DateTime<Utc>) {
        if let Some(status) = self.status {
            job.status = status;
        }
        if let Some(robot) = self.assigned_robot_id {
            job.assigned_robot_id = Some(robot);
        }
        job.updated_at = now;
    }
}
