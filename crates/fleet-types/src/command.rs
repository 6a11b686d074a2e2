//! Operator movement commands.
//!
//! The accepted vocabulary is deliberately closed: five directions,
//! matched exactly and case-sensitively. There is no default direction
//! and no synonym table.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A movement direction a robot can be told to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Direction {
    /// Drive forward.
    Forward,
    /// Drive backward.
    Backward,
    /// Turn left.
    Left,
    /// Turn right.
    Right,
    /// Halt.
    Stop,
}

impl Direction {
    /// Every accepted direction.
    pub const ALL: [Self; 5] = [
        Self::Forward,
        Self::Backward,
        Self::Left,
        Self::Right,
        Self::Stop,
    ];

    /// Wire name of the direction.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
            Self::Left => "left",
            Self::Right => "right",
            Self::Stop => "stop",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the accepted directions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported direction: {0:?}")]
pub struct UnsupportedDirection(pub String);

impl FromStr for Direction {
    type Err = UnsupportedDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| UnsupportedDirection(s.to_owned()))
    }
}

/// Request body for issuing a movement command.
///
/// `direction` stays a raw string here so that validation happens in the
/// command gateway and produces a proper validation error instead of a
/// body deserialization failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CommandRequest {
    /// Requested direction (see [`Direction`]).
    pub direction: String,
    /// Robot the command is meant for. Passed through to the forwarder
    /// untouched; it is not checked against the registry.
    #[serde(default)]
    pub robot_id: Option<String>,
}

impl CommandRequest {
    /// Build a request with no target robot.
    pub fn new(direction: impl Into<String>) -> Self {
        Self {
            direction: direction.into(),
            robot_id: None,
        }
    }
}

/// Acknowledgment returned for an accepted command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CommandAck {
    /// Always `true` for an acknowledgment; rejections are errors.
    pub accepted: bool,
    /// The direction that was accepted.
    pub direction: Direction,
}
