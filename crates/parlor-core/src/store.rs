//! Bounded, ordered message window.

use crate::message::{ChatMessage, MessageId};

/// Default number of messages retained in the active view.
pub const DEFAULT_CAPACITY: usize = 10;

/// Bounded-capacity ordered collection of the active room's messages.
///
/// Holds at most `capacity` messages, unique by [`MessageId`] and ordered by
/// creation timestamp ascending (ties broken by arrival order). The history
/// snapshot and the live stream race against each other, so
/// [`load_history`](Self::load_history) and [`append`](Self::append) both
/// enforce the same uniqueness/ordering invariant rather than assuming one
/// runs before the other.
#[derive(Debug, Clone)]
pub struct MessageStore {
    capacity: usize,
    messages: Vec<ChatMessage>,
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl MessageStore {
    /// Create an empty store holding at most `capacity` messages.
    pub fn new(capacity: usize) -> Self {
        Self { capacity, messages: Vec::with_capacity(capacity) }
    }

    /// Maximum number of retained messages.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of messages currently retained.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the store holds no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Whether a message with this identifier is retained.
    pub fn contains(&self, id: MessageId) -> bool {
        self.messages.iter().any(|m| m.id == id)
    }

    /// Merge a history batch into the store.
    ///
    /// Intended to be called at most once per room activation. Messages
    /// already present (delivered by the live stream before the snapshot
    /// resolved) are kept; the result is trimmed to the most recent
    /// `capacity` entries by timestamp.
    pub fn load_history(&mut self, batch: Vec<ChatMessage>) {
        for message in batch {
            self.insert(message);
        }
    }

    /// Insert one live message in timestamp order.
    ///
    /// Duplicate identifiers are rejected silently. Returns whether the
    /// message was inserted.
    pub fn append(&mut self, message: ChatMessage) -> bool {
        self.insert(message)
    }

    /// Read-only view of the current window, oldest first.
    pub fn snapshot(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Drop all messages, keeping the capacity.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    fn insert(&mut self, message: ChatMessage) -> bool {
        if self.contains(message.id) {
            return false;
        }
        // Equal timestamps keep arrival order: insert after the last tie.
        let index = self.messages.partition_point(|m| m.created_at <= message.created_at);
        self.messages.insert(index, message);
        if self.messages.len() > self.capacity {
            self.messages.remove(0);
        }
        true
    }
}
