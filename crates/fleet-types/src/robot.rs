//! Robot directory and telemetry types.
//!
//! [`RobotEndpoint`] describes where a robot's own HTTP and streaming
//! interface can be reached. [`RobotStatus`] is the latest telemetry a
//! robot (or something acting for it) has reported. Both are keyed by the
//! registrant-assigned robot `id`; the server never generates robot ids.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Default TCP port of a robot's own API.
pub const DEFAULT_ROBOT_PORT: u16 = 8000;

/// Default path prefix of a robot's own REST API.
pub const DEFAULT_BASE_PATH: &str = "/api/v1";

/// Default path of a robot's own status WebSocket.
pub const DEFAULT_WS_PATH: &str = "/ws/status";

const fn default_port() -> u16 {
    DEFAULT_ROBOT_PORT
}

fn default_base_path() -> String {
    DEFAULT_BASE_PATH.to_owned()
}

fn default_ws_path() -> String {
    DEFAULT_WS_PATH.to_owned()
}

/// Network endpoint descriptor for one robot.
///
/// Re-registering under the same `id` replaces the whole record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RobotEndpoint {
    /// Registrant-assigned, globally unique robot identifier.
    pub id: String,
    /// Human-readable robot name.
    pub name: String,
    /// Hostname or IP address the robot listens on.
    pub host: String,
    /// TCP port of the robot's API.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Path prefix of the robot's REST API.
    #[serde(default = "default_base_path")]
    pub base_path: String,
    /// Path of the robot's status WebSocket.
    #[serde(default = "default_ws_path")]
    pub ws_path: String,
}

impl RobotEndpoint {
    /// Create an endpoint with default port and paths.
    pub fn new(id: impl Into<String>, name: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            host: host.into(),
            port: DEFAULT_ROBOT_PORT,
            base_path: default_base_path(),
            ws_path: default_ws_path(),
        }
    }
}

/// Latest telemetry snapshot for one robot.
///
/// `last_seen` is optional on input only. Once stored in the registry it
/// is always set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RobotStatus {
    /// Robot identifier. May refer to a robot with no registered endpoint.
    pub id: String,
    /// Free-text status line.
    #[serde(default)]
    pub status_message: Option<String>,
    /// Battery level as reported by the robot.
    #[serde(default)]
    pub battery: Option<i32>,
    /// Building floor the robot is on.
    #[serde(default)]
    pub floor: Option<i32>,
    /// When the robot was last heard from (RFC 3339 on the wire).
    #[serde(default)]
    pub last_seen: Option<DateTime<Utc>>,
}

impl RobotStatus {
    /// Create an empty status record for `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status_message: None,
            battery: None,
            floor: None,
            last_seen: None,
        }
    }

    /// Set the free-text status line.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.status_message = Some(message.into());
        self
    }

    /// Set the battery level.
    #[must_use]
    pub const fn with_battery(mut self, battery: i32) -> Self {
        self.battery = Some(battery);
        self
    }

    /// Set the floor.
    #[must_use]
    pub const fn with_floor(mut self, floor: i32) -> Self {
        self.floor = Some(floor);
        self
    }

    /// Set an explicit `last_seen` timestamp.
    #[must_use]
    pub const fn seen_at(mut self, at: DateTime<Utc>) -> Self {
        self.last_seen = Some(at);
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_defaults_apply_when_omitted() {
        let json = r#"{"id":"r1","name":"Stairy","host":"10.0.0.5"}"#;
        let endpoint: RobotEndpoint = serde_json::from_str(json).unwrap();
        assert_eq!(endpoint.id, "r1");
        assert_eq!(endpoint.port, 8000);
        assert_eq!(endpoint.base_path, "/api/v1");
        assert_eq!(endpoint.ws_path, "/ws/status");
    }

    #[test]
    fn status_absent_fields_serialize_as_null() {
        let status = RobotStatus::new("r1").with_battery(80);
        let value = serde_json::to_value(&status).unwrap();
        assert_eq!(value["id"], "r1");
        assert_eq!(value["battery"], 80);
        assert!(value["status_message"].is_null());
        assert!(value["floor"].is_null());
        assert!(value["last_seen"].is_null());
    }

    #[test]
    fn status_accepts_minimal_payload() {
        let status: RobotStatus = serde_json::from_str(r#"{"id":"r9"}"#).unwrap();
        assert_eq!(status, RobotStatus::new("r9"));
    }
}
