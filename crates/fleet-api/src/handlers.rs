//! REST endpoint handlers for the fleet API server.
//!
//! Robot handlers read and write the in-memory [`FleetRegistry`]; delivery
//! handlers go through the [`JobRepository`]. Routes marked "auth" take an
//! [`Authenticated`] extractor and reject the request before the handler
//! body runs.
//!
//! # Endpoints
//!
//! | Method | Path | Auth | Description |
//! |--------|------|------|-------------|
//! | `GET` | `/health` | | Liveness and registry sizes |
//! | `POST` | `/robot/register` | | Register or replace a robot endpoint |
//! | `POST` | `/robot/status` | | Report robot telemetry |
//! | `GET` | `/robot/status` | | All latest statuses |
//! | `GET` | `/robot/status/{id}` | | One robot's latest status |
//! | `GET` | `/robot/discovery` | yes | All registered endpoints |
//! | `POST` | `/robot/command` | yes | Validate and forward a movement command |
//! | `GET` | `/auth/me` | yes | The calling principal |
//! | `GET` | `/delivery/jobs` | yes | List jobs, newest first |
//! | `POST` | `/delivery/jobs` | yes | Create a job |
//! | `GET` | `/delivery/jobs/{id}` | yes | One job |
//! | `PATCH` | `/delivery/jobs/{id}` | yes | Update status / assignment |
//! | `DELETE` | `/delivery/jobs/{id}` | yes | Delete a job |
//!
//! [`FleetRegistry`]: fleet_core::FleetRegistry
//! [`JobRepository`]: fleet_db::JobRepository

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use fleet_types::{
    CommandRequest, DeliveryJob, DeliveryJobUpdate, JobId, NewDeliveryJob, RobotEndpoint,
    RobotStatus,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::auth::Authenticated;
use crate::error::ApiError;
use crate::extract::Json;
use crate::state::AppState;

/// Status message recorded for a robot when it registers.
pub const REGISTERED_MESSAGE: &str = "Registered";

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

/// Report liveness plus the current registry sizes.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "app": state.app_name,
        "endpoints": state.registry.endpoint_count().await,
        "statuses": state.registry.status_count().await,
        "job_store": state.jobs.backend(),
    }))
}

// ---------------------------------------------------------------------------
// Robot registry
// ---------------------------------------------------------------------------

/// Register (or re-register) a robot endpoint.
///
/// Also records a `"Registered"` status for the robot so it shows up on
/// the live status stream straight away.
pub async fn register_robot(
    State(state): State<Arc<AppState>>,
    Json(endpoint): Json<RobotEndpoint>,
) -> Json<RobotEndpoint> {
    state.registry.register_endpoint(endpoint.clone()).await;
    state
        .registry
        .update_status(RobotStatus::new(endpoint.id.clone()).with_message(REGISTERED_MESSAGE))
        .await;

    info!(robot_id = %endpoint.id, host = %endpoint.host, port = endpoint.port, "Robot registered");
    Json(endpoint)
}

/// Store a robot's latest telemetry and return the stored record.
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Json(status): Json<RobotStatus>,
) -> Json<RobotStatus> {
    let stored = state.registry.update_status(status).await;
    debug!(robot_id = %stored.id, "Robot status updated");
    Json(stored)
}

/// Latest status of every robot that has reported.
pub async fn list_status(State(state): State<Arc<AppState>>) -> Json<Vec<RobotStatus>> {
    Json(state.registry.list_status().await)
}

/// Latest status of one robot.
pub async fn get_status(
    State(state): State<Arc<AppState>>,
    Path(robot_id): Path<String>,
) -> Result<Json<RobotStatus>, ApiError> {
    state
        .registry
        .get_status(&robot_id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(String::from("Robot not found")))
}

/// Every registered robot endpoint.
pub async fn discovery(
    State(state): State<Arc<AppState>>,
    Authenticated(_): Authenticated,
) -> Json<Vec<RobotEndpoint>> {
    Json(state.registry.list_endpoints().await)
}

/// Validate a movement command and hand it to the forwarder.
pub async fn issue_command(
    State(state): State<Arc<AppState>>,
    Authenticated(principal): Authenticated,
    Json(request): Json<CommandRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let ack = state.gateway.issue(&request)?;
    info!(
        subject = %principal.subject,
        direction = %ack.direction,
        "Command issued"
    );
    Ok(Json(ack))
}

// ---------------------------------------------------------------------------
// GET /auth/me
// ---------------------------------------------------------------------------

/// The principal the bearer token resolves to.
pub async fn me(Authenticated(principal): Authenticated) -> impl IntoResponse {
    Json(principal)
}

// ---------------------------------------------------------------------------
// Delivery jobs
// ---------------------------------------------------------------------------

/// All delivery jobs, newest first.
pub async fn list_jobs(
    State(state): State<Arc<AppState>>,
    Authenticated(_): Authenticated,
) -> Result<Json<Vec<DeliveryJob>>, ApiError> {
    Ok(Json(state.jobs.list().await?))
}

/// Create a delivery job and notify the requester.
pub async fn create_job(
    State(state): State<Arc<AppState>>,
    Authenticated(principal): Authenticated,
    Json(new_job): Json<NewDeliveryJob>,
) -> Result<impl IntoResponse, ApiError> {
    let job = state.jobs.create(new_job).await?;
    state.notifier.delivery_update(
        &job.requested_by,
        &format!("Delivery job '{}' created", job.title),
    );
    info!(job_id = %job.id, subject = %principal.subject, "Delivery job created");
    Ok((StatusCode::CREATED, Json(job)))
}

/// One delivery job.
pub async fn get_job(
    State(state): State<Arc<AppState>>,
    Authenticated(_): Authenticated,
    Path(id_str): Path<String>,
) -> Result<Json<DeliveryJob>, ApiError> {
    let id = parse_job_id(&id_str)?;
    state.jobs.get(id).await?.map(Json).ok_or_else(job_not_found)
}

/// Apply a partial update and notify the requester.
pub async fn update_job(
    State(state): State<Arc<AppState>>,
    Authenticated(_): Authenticated,
    Path(id_str): Path<String>,
    Json(patch): Json<DeliveryJobUpdate>,
) -> Result<Json<DeliveryJob>, ApiError> {
    let id = parse_job_id(&id_str)?;
    let job = state
        .jobs
        .update(id, patch)
        .await?
        .ok_or_else(job_not_found)?;
    state.notifier.delivery_update(
        &job.requested_by,
        &format!("Delivery job '{}' is now {}", job.title, job.status),
    );
    debug!(job_id = %job.id, status = %job.status, "Delivery job updated");
    Ok(Json(job))
}

/// Delete a delivery job.
pub async fn delete_job(
    State(state): State<Arc<AppState>>,
    Authenticated(_): Authenticated,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_job_id(&id_str)?;
    if !state.jobs.delete(id).await? {
        return Err(job_not_found());
    }
    info!(job_id = %id, "Delivery job deleted");
    Ok(Json(serde_json::json!({ "deleted": true })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_job_id(s: &str) -> Result<JobId, ApiError> {
    s.parse::<Uuid>()
        .map(JobId::from)
        .map_err(|e| ApiError::InvalidUuid(format!("invalid job id '{s}': {e}")))
}

fn job_not_found() -> ApiError {
    ApiError::NotFound(String::from("Job not found"))
}
