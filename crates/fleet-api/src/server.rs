//! Listener setup for the fleet API.
//!
//! [`ServerConfig`] is the slice of [`FleetConfig`] the listener needs.
//! [`start_server`] binds it and serves until aborted.

use std::net::SocketAddr;
use std::sync::Arc;

use fleet_core::FleetConfig;
use tokio::net::TcpListener;
use tracing::info;

use crate::router::{RouterOptions, build_router};
use crate::state::AppState;

/// Where and how the API listens.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface address.
    pub host: String,
    /// TCP port.
    pub port: u16,
    /// Route prefix and CORS settings.
    pub router: RouterOptions,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 8080,
            router: RouterOptions::default(),
        }
    }
}

impl ServerConfig {
    /// Listener and routing settings from the loaded configuration.
    pub fn from_fleet_config(config: &FleetConfig) -> Self {
        Self {
            host: config.server.host.clone(),
            port: config.server.port,
            router: RouterOptions {
                api_prefix: config.api_prefix.clone(),
                allowed_origins: config.cors.allowed_origins.clone(),
            },
        }
    }

    /// The socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if host and port do not form a valid
    /// address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ServerError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ServerError::Bind(format!("invalid address: {e}")))
    }
}

/// Serve the fleet API on the configured address.
///
/// The listener is bound before the first log line so a port clash is
/// reported to the caller, not buried in the task log. Never returns while
/// the server is healthy.
///
/// # Errors
///
/// [`ServerError::Bind`] for an unusable address, [`ServerError::Serve`]
/// if axum stops with an I/O error.
pub async fn start_server(config: &ServerConfig, state: Arc<AppState>) -> Result<(), ServerError> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(format!("cannot listen on {addr}: {e}")))?;

    info!(%addr, api_prefix = %config.router.api_prefix, "Fleet API listening");

    axum::serve(listener, build_router(state, &config.router))
        .await
        .map_err(|e| ServerError::Serve(e.to_string()))
}

/// Failures of the fleet API listener.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The host/port pair is invalid or already taken.
    #[error("cannot bind fleet API: {0}")]
    Bind(String),

    /// The accept loop failed after startup.
    #[error("fleet API stopped: {0}")]
    Serve(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use fleet_db::JobRepository;

    use super::*;

    #[tokio::test]
    async fn port_in_use_is_a_bind_error() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let config = ServerConfig {
            host: String::from("127.0.0.1"),
            port: taken.local_addr().unwrap().port(),
            ..ServerConfig::default()
        };
        let state = Arc::new(AppState::new(JobRepository::in_memory()));
        let result = start_server(&config, state).await;
        assert!(matches!(result, Err(ServerError::Bind(_))));
    }

    #[test]
    fn invalid_host_is_a_bind_error() {
        let config = ServerConfig {
            host: String::from("not a host"),
            ..ServerConfig::default()
        };
        assert!(matches!(config.socket_addr(), Err(ServerError::Bind(_))));
    }

    #[test]
    fn settings_come_from_fleet_config() {
        let mut fleet = FleetConfig::default();
        fleet.server.port = 9300;
        fleet.api_prefix = String::from("/fleet");
        let config = ServerConfig::from_fleet_config(&fleet);
        assert_eq!(config.port, 9300);
        assert_eq!(config.router.api_prefix, "/fleet");
        assert!(config.router.allowed_origins.is_empty());
    }
}
