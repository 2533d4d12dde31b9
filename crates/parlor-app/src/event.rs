//! Session input events.

use parlor_core::{ChatMessage, ConnectionStatus, ServerFrame};

/// Events fed into the [`crate::Session`] state machine.
///
/// Every event carries the activation epoch it was produced for. The
/// session discards events whose epoch is not current, which is how a
/// history fetch that resolves after the user has switched rooms is
/// suppressed without cancelling the request itself.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The history snapshot resolved successfully.
    HistoryLoaded {
        /// Activation epoch the fetch was started for.
        epoch: u64,
        /// Normalized batch, oldest first.
        messages: Vec<ChatMessage>,
    },

    /// The history snapshot failed; the store is left untouched.
    HistoryFailed {
        /// Activation epoch the fetch was started for.
        epoch: u64,
        /// Human-readable failure description.
        reason: String,
    },

    /// The streaming connection changed status.
    Status {
        /// Activation epoch the connection belongs to.
        epoch: u64,
        /// New status.
        status: ConnectionStatus,
    },

    /// A frame arrived on the streaming connection.
    Frame {
        /// Activation epoch the connection belongs to.
        epoch: u64,
        /// Parsed inbound frame.
        frame: ServerFrame,
    },
}

impl SessionEvent {
    /// Activation epoch this event was produced for.
    pub fn epoch(&self) -> u64 {
        match self {
            Self::HistoryLoaded { epoch, .. }
            | Self::HistoryFailed { epoch, .. }
            | Self::Status { epoch, .. }
            | Self::Frame { epoch, .. } => *epoch,
        }
    }
}
