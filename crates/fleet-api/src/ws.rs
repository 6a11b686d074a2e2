//! `WebSocket` transport for the live status stream.
//!
//! Clients connect to `GET {api_prefix}/robot/ws/status` and immediately
//! receive the full status table as a JSON array. Each further snapshot is
//! sent only after the client sends a text or binary message back; the
//! content of that message is ignored. Ping/pong frames keep the socket
//! alive but do not count as acknowledgments.
//!
//! The pacing itself lives in [`fleet_core::StatusChannel`]; this module
//! only adapts an axum [`WebSocket`] to [`ObserverLink`].

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use fleet_core::{ChannelExit, Inbound, LinkClosed, ObserverLink, StatusChannel};
use tracing::debug;

use crate::state::AppState;

/// An axum [`WebSocket`] viewed as a status observer.
#[derive(Debug)]
pub struct WsLink {
    socket: WebSocket,
}

impl WsLink {
    /// Wrap an upgraded socket.
    pub const fn new(socket: WebSocket) -> Self {
        Self { socket }
    }
}

impl ObserverLink for WsLink {
    async fn send_snapshot(&mut self, payload: String) -> Result<(), LinkClosed> {
        self.socket
            .send(Message::Text(payload.into()))
            .await
            .map_err(|e| {
                debug!(error = %e, "WebSocket send failed");
                LinkClosed
            })
    }

    async fn next_inbound(&mut self) -> Inbound {
        match self.socket.recv().await {
            Some(Ok(Message::Text(_) | Message::Binary(_))) => Inbound::Ack,
            Some(Ok(Message::Ping(_) | Message::Pong(_))) => Inbound::Control,
            Some(Ok(Message::Close(_))) | None => Inbound::Closed,
            Some(Err(e)) => {
                debug!(error = %e, "WebSocket receive failed");
                Inbound::Closed
            }
        }
    }
}

/// Upgrade an HTTP request to a `WebSocket` connection and begin
/// streaming robot status snapshots.
///
/// # Route
///
/// `GET {api_prefix}/robot/ws/status`
pub async fn ws_status(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// Drive one observer's [`StatusChannel`] until it ends.
async fn handle_ws(socket: WebSocket, state: Arc<AppState>) {
    debug!("Status observer connected");

    let channel = StatusChannel::new(Arc::clone(&state.registry), WsLink::new(socket))
        .with_ack_timeout(state.ack_timeout);
    if channel.run().await == ChannelExit::AckTimeout {
        debug!("Status observer dropped after ack timeout");
    }
}
