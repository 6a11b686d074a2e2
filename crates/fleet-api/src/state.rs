//! Shared application state for the fleet API server.
//!
//! [`AppState`] bundles the robot registry, the delivery job repository
//! and the injected collaborators (command forwarder, notifier,
//! authenticator). It is built once at startup, wrapped in an [`Arc`] and
//! handed to the router. Nothing in here is global.

use std::sync::Arc;
use std::time::Duration;

use fleet_core::{
    Authenticator, CommandGateway, FleetConfig, FleetRegistry, LogNotifier, Notifier,
    StaticTokenAuthenticator,
};
use fleet_db::JobRepository;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Service name reported by `/health`.
    pub app_name: String,
    /// Robot endpoint directory and status table.
    pub registry: Arc<FleetRegistry>,
    /// Delivery job storage.
    pub jobs: JobRepository,
    /// Movement command validation and forwarding.
    pub gateway: CommandGateway,
    /// Bearer token verification.
    pub authenticator: Arc<dyn Authenticator>,
    /// Delivery notifications.
    pub notifier: Arc<dyn Notifier>,
    /// Per-observer ack timeout for the status stream. `None` waits forever.
    pub ack_timeout: Option<Duration>,
}

impl core::fmt::Debug for AppState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppState")
            .field("app_name", &self.app_name)
            .field("jobs", &self.jobs.backend())
            .field("ack_timeout", &self.ack_timeout)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// State with an empty registry, the given job store and default
    /// collaborators. No operator tokens are accepted until
    /// [`with_authenticator`](Self::with_authenticator) is called.
    pub fn new(jobs: JobRepository) -> Self {
        Self {
            app_name: FleetConfig::default().app_name,
            registry: Arc::new(FleetRegistry::new()),
            jobs,
            gateway: CommandGateway::default(),
            authenticator: Arc::new(StaticTokenAuthenticator::default()),
            notifier: Arc::new(LogNotifier),
            ack_timeout: None,
        }
    }

    /// State wired from loaded configuration.
    pub fn from_config(config: &FleetConfig, jobs: JobRepository) -> Self {
        Self {
            app_name: config.app_name.clone(),
            authenticator: Arc::new(StaticTokenAuthenticator::from_operators(
                &config.auth.operators,
            )),
            ack_timeout: config.status_channel.ack_timeout(),
            ..Self::new(jobs)
        }
    }

    /// Replace the authenticator.
    #[must_use]
    pub fn with_authenticator(mut self, authenticator: Arc<dyn Authenticator>) -> Self {
        self.authenticator = authenticator;
        self
    }

    /// Replace the command gateway.
    #[must_use]
    pub fn with_gateway(mut self, gateway: CommandGateway) -> Self {
        self.gateway = gateway;
        self
    }

    /// Replace the notifier.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Set the status stream ack timeout.
    #[must_use]
    pub const fn with_ack_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.ack_timeout = timeout;
        self
    }
}
