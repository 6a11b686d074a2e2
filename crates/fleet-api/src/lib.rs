//! HTTP and `WebSocket` surface of the fleet operations backend.
//!
//! This crate provides an Axum server that exposes:
//!
//! - **Robot endpoints** for registration, telemetry reporting, discovery
//!   and movement commands
//! - **Live status stream** (`/robot/ws/status`), an observer-paced
//!   `WebSocket` driven by [`fleet_core::StatusChannel`]
//! - **Delivery job endpoints** (CRUD) backed by a
//!   [`JobRepository`](fleet_db::JobRepository)
//! - **`/auth/me`** and **`/health`**
//!
//! # Architecture
//!
//! All request handlers share one [`AppState`]. The robot registry is an
//! in-memory [`FleetRegistry`](fleet_core::FleetRegistry) behind
//! per-table locks, so status reads never wait on the job database.
//! Protected routes take the [`Authenticated`](auth::Authenticated)
//! extractor, which resolves a bearer token through the configured
//! authenticator.

pub mod auth;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::{RouterOptions, build_router};
pub use server::{ServerConfig, ServerError, start_server};
pub use startup::{StartupError, spawn_api};
pub use state::AppState;
