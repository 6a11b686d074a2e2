//! Robot fleet registry, live status channel, and command gateway.
//!
//! This crate holds the only genuinely shared, concurrently mutated state
//! of the backend: which robots exist and what they last reported. HTTP
//! handlers write into it, and every connected status observer reads from
//! it in an observer-paced loop.
//!
//! # Modules
//!
//! - [`registry`] -- [`FleetRegistry`]: endpoint directory + status table.
//! - [`status_channel`] -- [`StatusChannel`]: the send / await-ack state
//!   machine behind the live status stream.
//! - [`command`] -- [`CommandGateway`] and the [`CommandForwarder`] seam to
//!   a robot transport.
//! - [`notify`] -- [`Notifier`] seam for delivery notifications.
//! - [`auth`] -- [`Authenticator`] seam and the static bearer-token default.
//! - [`config`] -- Layered YAML + environment configuration.
//!
//! [`FleetRegistry`]: registry::FleetRegistry
//! [`StatusChannel`]: status_channel::StatusChannel
//! [`CommandGateway`]: command::CommandGateway
//! [`CommandForwarder`]: command::CommandForwarder
//! [`Notifier`]: notify::Notifier
//! [`Authenticator`]: auth::Authenticator

pub mod auth;
pub mod command;
pub mod config;
pub mod notify;
pub mod registry;
pub mod status_channel;

pub use auth::{AuthError, Authenticator, Principal, StaticTokenAuthenticator};
pub use command::{CommandError, CommandForwarder, CommandGateway, ForwardError, LoggingForwarder};
pub use crate::config::{ConfigError, FleetConfig};
pub use notify::{LogNotifier, Notifier};
pub use registry::FleetRegistry;
pub use status_channel::{ChannelExit, ChannelState, Inbound, LinkClosed, ObserverLink, StatusChannel};
