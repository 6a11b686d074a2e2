//! Observer-paced live status stream.
//!
//! Each connected observer gets its own [`StatusChannel`], an explicit
//! two-state machine:
//!
//! ```text
//!            +----------- ack received -----------+
//!            v                                    |
//!       [Sending] --- snapshot sent ---> [AwaitingAck]
//!            |                                    |
//!       send failed                    closed / ack timeout
//!            v                                    v
//!          exit                                 exit
//! ```
//!
//! In `Sending` the full status table is serialized as one JSON array and
//! pushed as a single message. In `AwaitingAck` the channel blocks until
//! the observer sends *any* data message; its content is ignored. The
//! server therefore never pushes a second snapshot before the observer
//! has acknowledged the previous one.
//!
//! The machine is transport-agnostic: it drives an [`ObserverLink`]. The
//! API crate implements the link for an axum `WebSocket`.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::registry::FleetRegistry;

/// What the link produced while the channel was waiting for an ack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inbound {
    /// A data message from the observer. Counts as an acknowledgment.
    Ack,
    /// A transport control frame (ping/pong). Does not count as an ack.
    Control,
    /// The observer went away (close frame, end of stream, or error).
    Closed,
}

/// The observer can no longer be written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("observer link closed")]
pub struct LinkClosed;

/// A bidirectional connection to one status observer.
pub trait ObserverLink: Send {
    /// Push one serialized snapshot to the observer.
    fn send_snapshot(
        &mut self,
        payload: String,
    ) -> impl Future<Output = Result<(), LinkClosed>> + Send;

    /// Wait for the next inbound message from the observer.
    fn next_inbound(&mut self) -> impl Future<Output = Inbound> + Send;
}

/// Current state of a [`StatusChannel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// The next step serializes and sends a snapshot.
    Sending,
    /// The next step waits for the observer's acknowledgment.
    AwaitingAck,
}

/// Why a [`StatusChannel`] stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelExit {
    /// The observer disconnected. This is the normal way a channel ends.
    ObserverClosed,
    /// The observer did not acknowledge within the configured timeout.
    AckTimeout,
    /// The status table could not be serialized.
    Serialization,
}

/// Serialize the current status table as a JSON array.
///
/// # Errors
///
/// Returns the [`serde_json::Error`] if serialization fails.
pub async fn render_snapshot(registry: &FleetRegistry) -> Result<String, serde_json::Error> {
    let statuses = registry.list_status().await;
    serde_json::to_string(&statuses)
}

/// Per-observer send / await-ack loop over the fleet status table.
pub struct StatusChannel<L> {
    registry: Arc<FleetRegistry>,
    link: L,
    state: ChannelState,
    ack_timeout: Option<Duration>,
    snapshots_sent: u64,
}

impl<L: ObserverLink> StatusChannel<L> {
    /// Create a channel in the [`ChannelState::Sending`] state.
    ///
    /// The default waits for acknowledgments without a deadline.
    pub const fn new(registry: Arc<FleetRegistry>, link: L) -> Self {
        Self {
            registry,
            link,
            state: ChannelState::Sending,
            ack_timeout: None,
            snapshots_sent: 0,
        }
    }

    /// Drop the observer if it does not acknowledge within `timeout`.
    #[must_use]
    pub const fn with_ack_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.ack_timeout = timeout;
        self
    }

    /// Current state.
    pub const fn state(&self) -> ChannelState {
        self.state
    }

    /// Number of snapshots pushed so far.
    pub const fn snapshots_sent(&self) -> u64 {
        self.snapshots_sent
    }

    /// Run until the observer goes away.
    pub async fn run(mut self) -> ChannelExit {
        loop {
            if let Some(exit) = self.step().await {
                debug!(
                    snapshots_sent = self.snapshots_sent,
                    ?exit,
                    "Status channel finished"
                );
                return exit;
            }
        }
    }

    /// Perform one state transition.
    ///
    /// Returns `Some` when the channel has terminated.
    pub async fn step(&mut self) -> Option<ChannelExit> {
        match self.state {
            ChannelState::Sending => self.send_snapshot().await,
            ChannelState::AwaitingAck => self.await_ack().await,
        }
    }

    async fn send_snapshot(&mut self) -> Option<ChannelExit> {
        let payload = match render_snapshot(&self.registry).await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize status snapshot");
                return Some(ChannelExit::Serialization);
            }
        };

        if self.link.send_snapshot(payload).await.is_err() {
            return Some(ChannelExit::ObserverClosed);
        }

        self.snapshots_sent = self.snapshots_sent.saturating_add(1);
        self.state = ChannelState::AwaitingAck;
        None
    }

    async fn await_ack(&mut self) -> Option<ChannelExit> {
        let acked = match self.ack_timeout {
            None => wait_for_ack(&mut self.link).await,
            Some(limit) => match tokio::time::timeout(limit, wait_for_ack(&mut self.link)).await {
                Ok(acked) => acked,
                Err(_elapsed) => return Some(ChannelExit::AckTimeout),
            },
        };

        if acked {
            self.state = ChannelState::Sending;
            None
        } else {
            Some(ChannelExit::ObserverClosed)
        }
    }
}

/// Wait for a data message, skipping control frames. `false` means closed.
async fn wait_for_ack<L: ObserverLink>(link: &mut L) -> bool {
    loop {
        match link.next_inbound().await {
            Inbound::Ack => return true,
            Inbound::Control => {}
            Inbound::Closed => return false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use fleet_types::RobotStatus;
    use serde_json::Value;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    use super::*;

    /// In-memory link. The test holds the other ends of both queues.
    struct MemoryLink {
        outbound: mpsc::UnboundedSender<String>,
        inbound: mpsc::UnboundedReceiver<Inbound>,
    }

    impl ObserverLink for MemoryLink {
        async fn send_snapshot(&mut self, payload: String) -> Result<(), LinkClosed> {
            self.outbound.send(payload).map_err(|_closed| LinkClosed)
        }

        async fn next_inbound(&mut self) -> Inbound {
            self.inbound.recv().await.unwrap_or(Inbound::Closed)
        }
    }

    struct Observer {
        snapshots: mpsc::UnboundedReceiver<String>,
        acks: mpsc::UnboundedSender<Inbound>,
    }

    impl Observer {
        async fn next_snapshot(&mut self) -> Vec<Value> {
            let raw = timeout(Duration::from_secs(5), self.snapshots.recv())
                .await
                .expect("snapshot within deadline")
                .expect("channel still open");
            let value: Value = serde_json::from_str(&raw).unwrap();
            value.as_array().expect("snapshot is a JSON array").clone()
        }

        fn ack(&self) {
            self.acks.send(Inbound::Ack).unwrap();
        }

        async fn assert_no_snapshot(&mut self) {
            let waited = timeout(Duration::from_secs(30), self.snapshots.recv()).await;
            assert!(waited.is_err(), "no snapshot may arrive without an ack");
        }
    }

    fn connect() -> (MemoryLink, Observer) {
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (in_tx, in_rx) = mpsc::unbounded_channel();
        (
            MemoryLink {
                outbound: out_tx,
                inbound: in_rx,
            },
            Observer {
                snapshots: out_rx,
                acks: in_tx,
            },
        )
    }

    fn ids(snapshot: &[Value]) -> Vec<&str> {
        let mut ids: Vec<&str> = snapshot.iter().filter_map(|s| s["id"].as_str()).collect();
        ids.sort_unstable();
        ids
    }

    #[tokio::test]
    async fn first_snapshot_reflects_current_table() {
        let registry = Arc::new(FleetRegistry::new());
        registry
            .update_status(RobotStatus::new("r0").with_battery(77))
            .await;

        let (link, mut observer) = connect();
        tokio::spawn(StatusChannel::new(Arc::clone(&registry), link).run());

        let s0 = observer.next_snapshot().await;
        assert_eq!(ids(&s0), vec!["r0"]);
        assert_eq!(s0[0]["battery"], 77);
        assert!(s0[0]["status_message"].is_null());
        assert!(s0[0]["last_seen"].is_string());
    }

    #[tokio::test]
    async fn empty_table_sends_empty_array() {
        let registry = Arc::new(FleetRegistry::new());
        let (link, mut observer) = connect();
        tokio::spawn(StatusChannel::new(registry, link).run());
        assert!(observer.next_snapshot().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn no_second_snapshot_without_ack() {
        let registry = Arc::new(FleetRegistry::new());
        let (link, mut observer) = connect();
        tokio::spawn(StatusChannel::new(Arc::clone(&registry), link).run());

        let _s0 = observer.next_snapshot().await;
        registry.update_status(RobotStatus::new("r1")).await;
        observer.assert_no_snapshot().await;

        observer.ack();
        let s1 = observer.next_snapshot().await;
        assert_eq!(ids(&s1), vec!["r1"]);
    }

    #[tokio::test]
    async fn ack_after_update_delivers_new_status() {
        let registry = Arc::new(FleetRegistry::new());
        registry
            .update_status(RobotStatus::new("r0").with_floor(1))
            .await;
        registry
            .update_status(RobotStatus::new("r1").with_battery(10))
            .await;

        let (link, mut observer) = connect();
        tokio::spawn(StatusChannel::new(Arc::clone(&registry), link).run());

        let s0 = observer.next_snapshot().await;
        assert_eq!(ids(&s0), vec!["r0", "r1"]);

        observer.ack();
        let _refresh = observer.next_snapshot().await;

        registry
            .update_status(RobotStatus::new("r1").with_battery(95).with_message("ok"))
            .await;
        observer.ack();
        let s1 = observer.next_snapshot().await;

        // Same identities as before; r1 carries only its newest record.
        assert_eq!(ids(&s1), vec!["r0", "r1"]);
        let r1 = s1.iter().find(|s| s["id"] == "r1").unwrap();
        assert_eq!(r1["battery"], 95);
        assert_eq!(r1["status_message"], "ok");
    }

    #[tokio::test(start_paused = true)]
    async fn control_frames_are_not_acks() {
        let registry = Arc::new(FleetRegistry::new());
        let (link, mut observer) = connect();
        tokio::spawn(StatusChannel::new(registry, link).run());

        let _s0 = observer.next_snapshot().await;
        observer.acks.send(Inbound::Control).unwrap();
        observer.acks.send(Inbound::Control).unwrap();
        observer.assert_no_snapshot().await;

        observer.ack();
        let _s1 = observer.next_snapshot().await;
    }

    #[tokio::test]
    async fn disconnect_mid_wait_ends_channel_cleanly() {
        let registry = Arc::new(FleetRegistry::new());
        registry.update_status(RobotStatus::new("r0")).await;
        let before = registry.list_status().await;

        let (link, mut observer) = connect();
        let task = tokio::spawn(StatusChannel::new(Arc::clone(&registry), link).run());

        let _s0 = observer.next_snapshot().await;
        drop(observer);

        let exit = timeout(Duration::from_secs(5), task).await.unwrap().unwrap();
        assert_eq!(exit, ChannelExit::ObserverClosed);
        assert_eq!(registry.list_status().await, before);
        assert_eq!(registry.endpoint_count().await, 0);
    }

    #[tokio::test]
    async fn send_failure_ends_channel() {
        let registry = Arc::new(FleetRegistry::new());
        let (link, observer) = connect();
        let Observer { snapshots, acks } = observer;
        drop(snapshots);

        let exit = StatusChannel::new(registry, link).run().await;
        assert_eq!(exit, ChannelExit::ObserverClosed);
        drop(acks);
    }

    #[tokio::test]
    async fn step_alternates_between_states() {
        let registry = Arc::new(FleetRegistry::new());
        let (link, mut observer) = connect();
        let mut channel = StatusChannel::new(registry, link);

        assert_eq!(channel.state(), ChannelState::Sending);
        assert_eq!(channel.step().await, None);
        assert_eq!(channel.state(), ChannelState::AwaitingAck);
        assert_eq!(channel.snapshots_sent(), 1);
        let _s0 = observer.next_snapshot().await;

        observer.ack();
        assert_eq!(channel.step().await, None);
        assert_eq!(channel.state(), ChannelState::Sending);
        assert_eq!(channel.snapshots_sent(), 1);

        assert_eq!(channel.step().await, None);
        assert_eq!(channel.snapshots_sent(), 2);

        drop(observer);
        assert_eq!(channel.step().await, Some(ChannelExit::ObserverClosed));
    }

    #[tokio::test(start_paused = true)]
    async fn ack_timeout_drops_silent_observer() {
        let registry = Arc::new(FleetRegistry::new());
        let (link, mut observer) = connect();
        let task = tokio::spawn(
            StatusChannel::new(registry, link)
                .with_ack_timeout(Some(Duration::from_secs(10)))
                .run(),
        );

        let _s0 = observer.next_snapshot().await;
        let exit = task.await.unwrap();
        assert_eq!(exit, ChannelExit::AckTimeout);
    }

    #[tokio::test]
    async fn observers_are_independent() {
        let registry = Arc::new(FleetRegistry::new());
        let (link_a, mut a) = connect();
        let (link_b, mut b) = connect();
        let task_a = tokio::spawn(StatusChannel::new(Arc::clone(&registry), link_a).run());
        tokio::spawn(StatusChannel::new(Arc::clone(&registry), link_b).run());

        let _ = a.next_snapshot().await;
        let _ = b.next_snapshot().await;

        drop(a);
        assert_eq!(task_a.await.unwrap(), ChannelExit::ObserverClosed);

        registry.update_status(RobotStatus::new("r7")).await;
        b.ack();
        assert_eq!(ids(&b.next_snapshot().await), vec!["r7"]);
    }
}
