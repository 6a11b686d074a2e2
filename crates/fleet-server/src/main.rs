//! Fleet operations backend server.
//!
//! Wires the robot registry, delivery job storage and the HTTP/WebSocket
//! API together and serves until `Ctrl-C`.
//!
//! # Startup Sequence
//!
//! 1. Load configuration (`FLEET_CONFIG` path or `fleet-config.yaml`,
//!    then `FLEET__*` environment variables)
//! 2. Initialize structured logging (tracing)
//! 3. Open the job database and apply migrations, or fall back to the
//!    in-memory job store when no database URL is set
//! 4. Build the shared application state
//! 5. Spawn the API server and wait for `Ctrl-C` or server exit

mod error;

use std::path::PathBuf;
use std::sync::Arc;

use fleet_api::{AppState, ServerConfig};
use fleet_core::config::LoggingConfig;
use fleet_core::{FleetConfig, StaticTokenAuthenticator};
use fleet_db::{JobRepository, PostgresConfig, PostgresPool};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::ServerBinError;

/// Environment variable naming an explicit config file.
const CONFIG_PATH_ENV: &str = "FLEET_CONFIG";

/// Application entry point for the fleet server.
///
/// # Errors
///
/// Returns an error if any initialization step fails or the server stops
/// with an error.
#[tokio::main]
async fn main() -> Result<(), ServerBinError> {
    // 1. Load configuration.
    let config_path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
    let config = FleetConfig::load(config_path.as_deref())?;

    // 2. Initialize structured logging.
    init_logging(&config.logging)?;
    info!(
        app_name = %config.app_name,
        api_prefix = %config.api_prefix,
        "fleet-server starting"
    );

    // 3. Job storage.
    let (jobs, pool) = open_job_store(&config).await?;

    // 4. Application state.
    let authenticator = StaticTokenAuthenticator::from_operators(&config.auth.operators);
    if authenticator.is_empty() {
        warn!("No operator tokens configured; every authenticated route will return 401");
    } else {
        info!(operators = authenticator.len(), "Operator tokens loaded");
    }
    let state = Arc::new(
        AppState::from_config(&config, jobs).with_authenticator(Arc::new(authenticator)),
    );

    // 5. Serve.
    let server_config = ServerConfig::from_fleet_config(&config);
    let mut handle = fleet_api::spawn_api(server_config, state)?;

    let outcome = tokio::select! {
        joined = &mut handle => match joined {
            Ok(result) => result.map_err(ServerBinError::from),
            Err(e) => Err(ServerBinError::Task { message: e.to_string() }),
        },
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                warn!(error = %e, "Failed to listen for Ctrl-C");
            }
            info!("Shutdown requested");
            handle.abort();
            Ok(())
        }
    };

    if let Some(pool) = pool {
        pool.close().await;
    }
    info!("fleet-server stopped");
    outcome
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
fn init_logging(logging: &LoggingConfig) -> Result<(), ServerBinError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .map_err(|e| ServerBinError::Logging {
            message: format!("invalid log filter '{}': {e}", logging.level),
        })?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if logging.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| ServerBinError::Logging {
        message: e.to_string(),
    })
}

/// Connect to `PostgreSQL` when a URL is configured, otherwise keep jobs in
/// memory.
async fn open_job_store(
    config: &FleetConfig,
) -> Result<(JobRepository, Option<PostgresPool>), ServerBinError> {
    let Some(url) = config.database.url.as_deref() else {
        warn!("No database URL configured; delivery jobs are kept in memory and lost on restart");
        return Ok((JobRepository::in_memory(), None));
    };

    let pg_config =
        PostgresConfig::new(url).with_max_connections(config.database.max_connections);
    let pool = PostgresPool::connect(&pg_config).await?;
    pool.migrate().await?;

    Ok((JobRepository::from(pool.job_store()), Some(pool)))
}
