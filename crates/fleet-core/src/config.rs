//! Configuration loading and typed config structures for the fleet backend.
//!
//! Configuration is layered with the [`config`](::config) crate:
//!
//! 1. built-in defaults (every field has one),
//! 2. an optional YAML file (`fleet-config.yaml` unless a path is given),
//! 3. environment variables prefixed `FLEET__`, with `__` between levels,
//!    e.g. `FLEET__SERVER__PORT=9000` or
//!    `FLEET__CORS__ALLOWED_ORIGINS=https://a.example,https://b.example`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Config file read when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "fleet-config.yaml";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "FLEET";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A source could not be read, parsed or mapped onto [`FleetConfig`].
    #[error("failed to load configuration: {source}")]
    Load {
        /// The underlying config error.
        #[from]
        source: ::config::ConfigError,
    },
}

/// Top-level backend configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    /// Display name of the service.
    pub app_name: String,
    /// Path prefix for every versioned API route.
    pub api_prefix: String,
    /// Listener settings.
    pub server: ServerSettings,
    /// Delivery job database.
    pub database: DatabaseConfig,
    /// Operator authentication.
    pub auth: AuthConfig,
    /// Cross-origin settings for the dashboard.
    pub cors: CorsConfig,
    /// Live status stream settings.
    pub status_channel: StatusChannelConfig,
    /// Log output.
    pub logging: LoggingConfig,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            api_prefix: default_api_prefix(),
            server: ServerSettings::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            cors: CorsConfig::default(),
            status_channel: StatusChannelConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Address to bind to.
    pub host: String,
    /// TCP port to listen on.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 8080,
        }
    }
}

/// Delivery job database settings.
///
/// Without a `url` the server keeps jobs in memory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: Option<String>,
    /// Maximum pool size.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
        }
    }
}

/// Operator authentication settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Bearer tokens keyed by operator subject. Empty means nobody can
    /// call authenticated routes.
    pub operators: BTreeMap<String, String>,
}

/// CORS settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins allowed to call the API. Empty disables the CORS layer.
    pub allowed_origins: Vec<String>,
}

/// Live status stream settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StatusChannelConfig {
    /// Drop observers that do not acknowledge a snapshot within this many
    /// seconds. Unset means wait forever.
    pub ack_timeout_secs: Option<u64>,
}

impl StatusChannelConfig {
    /// The ack timeout as a [`Duration`].
    pub fn ack_timeout(&self) -> Option<Duration> {
        self.ack_timeout_secs.map(Duration::from_secs)
    }
}

/// Logging settings. `RUST_LOG` takes precedence over `level`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive (e.g. `info`, `fleet_core=debug`).
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            json: false,
        }
    }
}

impl FleetConfig {
    /// Load configuration from file and environment.
    ///
    /// With `path = None` the default file is optional; an explicit path
    /// must exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if a source is unreadable or a value
    /// has the wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), Path::to_path_buf);

        let settings = ::config::Config::builder()
            .add_source(::config::File::from(file).required(path.is_some()))
            .add_source(env_source())
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Parse configuration from a YAML string (no environment layering).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if the YAML is invalid.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from_str(yaml, ::config::FileFormat::Yaml))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

fn env_source() -> ::config::Environment {
    ::config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("cors.allowed_origins")
        .try_parsing(true)
}

fn default_app_name() -> String {
    "Fleet Ops API".to_owned()
}

fn default_api_prefix() -> String {
    "/api/v1".to_owned()
}
