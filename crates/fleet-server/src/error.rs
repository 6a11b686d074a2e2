//! Error types for the fleet server binary.
//!
//! [`ServerBinError`] is the top-level error type that wraps every failure
//! mode during startup and serving.

/// Top-level error for the fleet server binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum ServerBinError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: fleet_core::ConfigError,
    },

    /// The job database could not be opened or migrated.
    #[error("database error: {source}")]
    Database {
        /// The underlying database error.
        #[from]
        source: fleet_db::DbError,
    },

    /// The API server failed to start or stopped with an error.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: fleet_api::ServerError,
    },

    /// The API server could not be spawned.
    #[error("startup error: {source}")]
    Startup {
        /// The underlying startup error.
        #[from]
        source: fleet_api::StartupError,
    },

    /// The logging subscriber could not be installed.
    #[error("logging error: {message}")]
    Logging {
        /// Description of the failure.
        message: String,
    },

    /// The server task panicked or was cancelled.
    #[error("server task error: {message}")]
    Task {
        /// Description of the failure.
        message: String,
    },
}
