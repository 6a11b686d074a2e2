//! Axum router construction for the fleet API.
//!
//! Versioned routes are nested under the configured API prefix; only
//! `/health` sits at the root. CORS is applied only when allowed origins
//! are configured.

use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Prefix used when none is configured.
pub const DEFAULT_API_PREFIX: &str = "/api/v1";

/// Routing options that come from configuration.
#[derive(Debug, Clone)]
pub struct RouterOptions {
    /// Path prefix for versioned routes.
    pub api_prefix: String,
    /// Origins allowed by CORS. Empty disables the CORS layer.
    pub allowed_origins: Vec<String>,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            api_prefix: DEFAULT_API_PREFIX.to_owned(),
            allowed_origins: Vec::new(),
        }
    }
}

/// Build the complete Axum router for the fleet API.
///
/// The router includes:
/// - `GET /health`
/// - `{prefix}/robot/...` -- registry, discovery, commands, status stream
/// - `{prefix}/auth/me`
/// - `{prefix}/delivery/jobs[/{id}]`
pub fn build_router(state: Arc<AppState>, options: &RouterOptions) -> Router {
    let api = Router::new()
        // Robots
        .route("/robot/register", post(handlers::register_robot))
        .route(
            "/robot/status",
            get(handlers::list_status).post(handlers::update_status),
        )
        .route("/robot/status/{id}", get(handlers::get_status))
        .route("/robot/discovery", get(handlers::discovery))
        .route("/robot/command", post(handlers::issue_command))
        .route("/robot/ws/status", get(ws::ws_status))
        // Auth
        .route("/auth/me", get(handlers::me))
        // Delivery
        .route(
            "/delivery/jobs",
            get(handlers::list_jobs).post(handlers::create_job),
        )
        .route(
            "/delivery/jobs/{id}",
            get(handlers::get_job)
                .patch(handlers::update_job)
                .delete(handlers::delete_job),
        );

    let prefix = normalize_prefix(&options.api_prefix);
    let router = Router::new().route("/health", get(handlers::health));
    let router = if prefix.is_empty() {
        router.merge(api)
    } else {
        router.nest(&prefix, api)
    };

    let router = match cors_layer(&options.allowed_origins) {
        Some(cors) => router.layer(cors),
        None => router,
    };

    router
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `"api/v1/"` -> `"/api/v1"`, `"/"` -> `""`.
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    if origins.is_empty() {
        return None;
    }

    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.iter().any(|origin| origin == "*") {
        return Some(cors.allow_origin(Any));
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    Some(cors.allow_origin(allowed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_is_normalized() {
        assert_eq!(normalize_prefix("/api/v1"), "/api/v1");
        assert_eq!(normalize_prefix("api/v1/"), "/api/v1");
        assert_eq!(normalize_prefix("/"), "");
        assert_eq!(normalize_prefix(""), "");
    }

    #[test]
    fn no_origins_means_no_cors() {
        assert!(cors_layer(&[]).is_none());
        assert!(cors_layer(&[String::from("https://ops.example")]).is_some());
    }
}
