//! Command gateway: operator intent in, validated robot command out.
//!
//! Validation is purely syntactic. The gateway checks that the requested
//! direction is one of the five accepted words and then hands it to a
//! [`CommandForwarder`]. It never looks at the fleet registry, so it does
//! not know or care whether the target robot is registered or online.
//!
//! The forwarder is the seam to a real robot transport (HTTP, MQTT, ...).
//! [`LoggingForwarder`] is the default and only records the command.

use std::sync::Arc;

use fleet_types::{CommandAck, CommandRequest, Direction, UnsupportedDirection};
use tracing::info;

/// A robot transport failed to take the command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("command transport error: {message}")]
pub struct ForwardError {
    /// Description of the transport failure.
    pub message: String,
}

/// Errors returned by [`CommandGateway::issue`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The direction is not one of the accepted values.
    #[error("unsupported direction: {0:?}")]
    UnsupportedDirection(String),

    /// The forwarder rejected the command.
    #[error(transparent)]
    Transport(#[from] ForwardError),
}

impl From<UnsupportedDirection> for CommandError {
    fn from(err: UnsupportedDirection) -> Self {
        Self::UnsupportedDirection(err.0)
    }
}

/// Delivers validated commands to robots.
pub trait CommandForwarder: Send + Sync {
    /// Forward `direction` to `robot_id` (or to whatever the transport
    /// considers the default target when `None`).
    ///
    /// # Errors
    ///
    /// Returns [`ForwardError`] if the transport cannot accept the command.
    fn forward(&self, direction: Direction, robot_id: Option<&str>) -> Result<(), ForwardError>;
}

/// Forwarder that only logs. Used until a robot transport is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingForwarder;

impl CommandForwarder for LoggingForwarder {
    fn forward(&self, direction: Direction, robot_id: Option<&str>) -> Result<(), ForwardError> {
        info!(
            %direction,
            robot_id = robot_id.unwrap_or("-"),
            "Command accepted (no robot transport configured)"
        );
        Ok(())
    }
}

/// Validates movement commands and passes them to a forwarder.
#[derive(Clone)]
pub struct CommandGateway {
    forwarder: Arc<dyn CommandForwarder>,
}

impl core::fmt::Debug for CommandGateway {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CommandGateway").finish_non_exhaustive()
    }
}

impl Default for CommandGateway {
    fn default() -> Self {
        Self::new(Arc::new(LoggingForwarder))
    }
}

impl CommandGateway {
    /// Create a gateway around `forwarder`.
    pub fn new(forwarder: Arc<dyn CommandForwarder>) -> Self {
        Self { forwarder }
    }

    /// Validate and forward a command.
    ///
    /// # Errors
    ///
    /// [`CommandError::UnsupportedDirection`] for anything outside
    /// `forward | backward | left | right | stop` (exact match), and
    /// [`CommandError::Transport`] if the forwarder fails.
    pub fn issue(&self, request: &CommandRequest) -> Result<CommandAck, CommandError> {
        let direction: Direction = request.direction.parse()?;
        self.forwarder
            .forward(direction, request.robot_id.as_deref())?;
        Ok(CommandAck {
            accepted: true,
            direction,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct RecordingForwarder {
        sent: Mutex<Vec<(Direction, Option<String>)>>,
    }

    impl CommandForwarder for RecordingForwarder {
        fn forward(&self, direction: Direction, robot_id: Option<&str>) -> Result<(), ForwardError> {
            self.sent
                .lock()
                .unwrap()
                .push((direction, robot_id.map(str::to_owned)));
            Ok(())
        }
    }

    struct BrokenForwarder;

    impl CommandForwarder for BrokenForwarder {
        fn forward(&self, _: Direction, _: Option<&str>) -> Result<(), ForwardError> {
            Err(ForwardError {
                message: String::from("broker unreachable"),
            })
        }
    }

    #[test]
    fn forward_is_accepted() {
        let ack = CommandGateway::default()
            .issue(&CommandRequest::new("forward"))
            .unwrap();
        assert!(ack.accepted);
        assert_eq!(ack.direction, Direction::Forward);
    }

    #[test]
    fn every_direction_is_accepted() {
        let gateway = CommandGateway::default();
        for word in ["forward", "backward", "left", "right", "stop"] {
            let ack = gateway.issue(&CommandRequest::new(word)).unwrap();
            assert_eq!(ack.direction.as_str(), word);
        }
    }

    #[test]
    fn unknown_direction_is_rejected() {
        let err = CommandGateway::default()
            .issue(&CommandRequest::new("up"))
            .unwrap_err();
        assert_eq!(err, CommandError::UnsupportedDirection(String::from("up")));
    }

    #[test]
    fn empty_direction_is_rejected() {
        assert!(matches!(
            CommandGateway::default().issue(&CommandRequest::new("")),
            Err(CommandError::UnsupportedDirection(_))
        ));
    }

    #[test]
    fn rejected_commands_never_reach_the_forwarder() {
        let recorder = Arc::new(RecordingForwarder::default());
        let gateway = CommandGateway::new(Arc::clone(&recorder) as Arc<dyn CommandForwarder>);

        assert!(gateway.issue(&CommandRequest::new("Left")).is_err());
        let request = CommandRequest {
            direction: String::from("left"),
            robot_id: Some(String::from("never-registered")),
        };
        gateway.issue(&request).unwrap();

        let sent = recorder.sent.lock().unwrap();
        assert_eq!(
            *sent,
            vec![(Direction::Left, Some(String::from("never-registered")))]
        );
    }

    #[test]
    fn transport_failure_is_reported() {
        let gateway = CommandGateway::new(Arc::new(BrokenForwarder));
        let err = gateway.issue(&CommandRequest::new("stop")).unwrap_err();
        assert!(matches!(err, CommandError::Transport(_)));
    }
}
