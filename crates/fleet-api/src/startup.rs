//! Background startup helper for the fleet API.
//!
//! [`spawn_api`] runs the HTTP + `WebSocket` server on its own Tokio task
//! so a caller can keep doing other work and decide when to stop it.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::server::{ServerConfig, ServerError};
use crate::state::AppState;

/// Errors that can occur when spawning the fleet API server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The server failed to bind or start.
    #[error("server start error: {0}")]
    Server(#[from] ServerError),
}

/// Spawn the fleet API server on a background Tokio task.
///
/// The address is validated before spawning so obvious
/// misconfigurations surface to the caller instead of the task log. The
/// returned handle resolves when the server stops; abort it to shut the
/// server down.
///
/// # Errors
///
/// Returns [`StartupError::Server`] if the configured address is invalid.
pub fn spawn_api(
    config: ServerConfig,
    state: Arc<AppState>,
) -> Result<JoinHandle<Result<(), ServerError>>, StartupError> {
    let addr = config.socket_addr()?;

    let handle = tokio::spawn(async move {
        let result = crate::server::start_server(&config, state).await;
        if let Err(e) = &result {
            tracing::error!(error = %e, "Fleet API exited with error");
        }
        result
    });

    tracing::info!(%addr, "Fleet API spawned on background task");

    Ok(handle)
}
