//! Observable room state for the presentation layer.

use parlor_core::{ChatMessage, ConnectionStatus, RoomId};

/// Read-only composite view of the active room.
///
/// Derived from the session on demand, never stored independently. The
/// presentation layer renders this and must not mutate session state
/// through any other path than the documented commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomView {
    /// Active room, if any.
    pub room: Option<RoomId>,
    /// Ordered message window, oldest first.
    pub messages: Vec<ChatMessage>,
    /// Current streaming connection status.
    pub connection: ConnectionStatus,
    /// Active presence notices, oldest first.
    pub notices: Vec<String>,
    /// Whether the history snapshot is still loading.
    pub loading_history: bool,
    /// Failure notice from the history fetch, cleared on re-activation.
    pub history_error: Option<String>,
    /// Whether a send would currently transmit; drives the send affordance
    /// so user input is never queued while disconnected.
    pub can_send: bool,
}
