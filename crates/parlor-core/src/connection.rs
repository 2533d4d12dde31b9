//! Streaming connection lifecycle states.

use std::fmt;

/// Lifecycle status of one streaming room connection.
///
/// Exactly one status exists per active room subscription. Transitions are
/// reported by the transport in arrival order; `Failed` is terminal until
/// the room is re-activated (no automatic reconnect).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// Handshake in progress; sends are not yet permitted.
    Connecting,
    /// Channel established; outbound sends are permitted.
    Open,
    /// Closed deliberately, either locally or by the server.
    Closed,
    /// Transport failed; sends stay disabled until re-activation.
    Failed,
}

impl ConnectionStatus {
    /// Whether outbound sends are permitted in this status.
    pub fn can_send(self) -> bool {
        matches!(self, Self::Open)
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}
