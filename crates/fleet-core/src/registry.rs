//! Process-wide robot registry.
//!
//! [`FleetRegistry`] owns two independently keyed maps:
//!
//! - the **endpoint directory** (robot id -> [`RobotEndpoint`])
//! - the **status table** (robot id -> latest [`RobotStatus`])
//!
//! There is no referential integrity between them. A robot may report
//! status without ever registering an endpoint, and an endpoint may exist
//! with no status yet. Nothing is ever removed: there is no deregistration
//! and `last_seen` is never used to expire entries.
//!
//! # Concurrency
//!
//! Each map sits behind its own [`RwLock`]. Every operation touches one
//! map and at most one key, so a snapshot read can never interleave with a
//! half-applied insert. Writes to the same key are serialized by the
//! write lock; the last one to acquire it wins.

use std::collections::BTreeMap;

use chrono::Utc;
use fleet_types::{RobotEndpoint, RobotStatus};
use tokio::sync::RwLock;
use tracing::debug;

/// Directory of robot endpoints and their latest telemetry.
///
/// Constructed once at startup and shared by [`Arc`](std::sync::Arc)
/// with every handler and status channel.
#[derive(Debug, Default)]
pub struct FleetRegistry {
    endpoints: RwLock<BTreeMap<String, RobotEndpoint>>,
    statuses: RwLock<BTreeMap<String, RobotStatus>>,
}

impl FleetRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the endpoint keyed by `endpoint.id`.
    pub async fn register_endpoint(&self, endpoint: RobotEndpoint) {
        let robot_id = endpoint.id.clone();
        let replaced = self
            .endpoints
            .write()
            .await
            .insert(robot_id.clone(), endpoint)
            .is_some();
        debug!(robot_id = %robot_id, replaced, "Robot endpoint registered");
    }

    /// Insert or replace the status keyed by `status.id`.
    ///
    /// A missing `last_seen` is stamped with the current time while the
    /// write lock is held, so the stored record is stable across reads.
    /// Returns the record as stored.
    pub async fn update_status(&self, mut status: RobotStatus) -> RobotStatus {
        let mut statuses = self.statuses.write().await;
        if status.last_seen.is_none() {
            status.last_seen = Some(Utc::now());
        }
        statuses.insert(status.id.clone(), status.clone());
        drop(statuses);

        debug!(robot_id = %status.id, "Robot status updated");
        status
    }

    /// Snapshot of the endpoint directory. Order is unspecified.
    pub async fn list_endpoints(&self) -> Vec<RobotEndpoint> {
        self.endpoints.read().await.values().cloned().collect()
    }

    /// Snapshot of the status table. Order is unspecified.
    pub async fn list_status(&self) -> Vec<RobotStatus> {
        self.statuses.read().await.values().cloned().collect()
    }

    /// Latest status for one robot.
    pub async fn get_status(&self, robot_id: &str) -> Option<RobotStatus> {
        self.statuses.read().await.get(robot_id).cloned()
    }

    /// Number of registered endpoints.
    pub async fn endpoint_count(&self) -> usize {
        self.endpoints.read().await.len()
    }

    /// Number of robots with a status entry.
    pub async fn status_count(&self) -> usize {
        self.statuses.read().await.len()
    }
}
