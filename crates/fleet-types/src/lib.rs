//! Shared type definitions for the fleet operations backend.
//!
//! Every crate in the workspace speaks these types, and they flow to
//! `TypeScript` via `ts-rs` for the operator dashboard.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for server-generated identifiers
//! - [`robot`] -- Robot endpoint descriptors and telemetry snapshots
//! - [`command`] -- Movement directions, command requests and acks
//! - [`delivery`] -- Delivery job records and their create/update payloads

pub mod command;
pub mod delivery;
pub mod ids;
pub mod robot;

// Re-export all public types at crate root for convenience.
pub use command::{CommandAck, CommandRequest, Direction, UnsupportedDirection};
pub use delivery::{DEFAULT_JOB_STATUS, DeliveryJob, DeliveryJobUpdate, NewDeliveryJob};
pub use ids::JobId;
pub use robot::{DEFAULT_ROBOT_PORT, RobotEndpoint, RobotStatus};
