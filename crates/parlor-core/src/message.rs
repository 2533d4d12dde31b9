//! Message and room directory entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::RoomId;

/// Server-assigned unique message identifier.
///
/// The sole de-duplication key inside the message store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

/// A chat message as delivered by the history endpoint or the live stream.
///
/// Created by the remote system and never mutated afterwards; the store
/// evicts it only through its bounded-window policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Server-assigned identifier.
    pub id: MessageId,
    /// Author of the message.
    pub username: String,
    /// Message body.
    pub content: String,
    /// Creation timestamp, normalized to UTC.
    pub created_at: DateTime<Utc>,
}

/// A room directory record from the room listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomInfo {
    /// Room identifier.
    pub id: RoomId,
    /// Human-readable room name.
    pub name: String,
}
