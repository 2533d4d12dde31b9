//! One-shot REST retrieval of recent room history.

use parlor_core::{ChatMessage, DEFAULT_CAPACITY, RoomId};

use crate::{Endpoints, error::RetrievalError};

/// Loader for the point-in-time history snapshot of a room.
///
/// The transport makes no ordering promise, so the batch is re-sorted to
/// ascending timestamps and truncated to the most recent `capacity`
/// entries before it reaches the message store. A failed fetch leaves the
/// store untouched.
#[derive(Debug, Clone)]
pub struct HistoryLoader {
    http: reqwest::Client,
    endpoints: Endpoints,
    capacity: usize,
}

impl HistoryLoader {
    /// Create a loader with the default window capacity.
    pub fn new(endpoints: Endpoints) -> Self {
        Self::with_capacity(endpoints, DEFAULT_CAPACITY)
    }

    /// Create a loader truncating to a custom window capacity.
    pub fn with_capacity(endpoints: Endpoints, capacity: usize) -> Self {
        Self { http: reqwest::Client::new(), endpoints, capacity }
    }

    /// Fetch the most recent messages for a room, oldest first.
    pub async fn fetch(&self, room_id: &RoomId) -> Result<Vec<ChatMessage>, RetrievalError> {
        let url = self.endpoints.messages_url(room_id);
        let body = self.http.get(url).send().await?.error_for_status()?.bytes().await?;
        let batch: Vec<ChatMessage> = serde_json::from_slice(&body)?;
        Ok(normalize(batch, self.capacity))
    }
}

/// Sort ascending by creation timestamp (stable, so server ties keep their
/// relative order) and keep only the most recent `capacity` entries.
fn normalize(mut batch: Vec<ChatMessage>, capacity: usize) -> Vec<ChatMessage> {
    batch.sort_by_key(|m| m.created_at);
    if batch.len() > capacity {
        batch.drain(..batch.len() - capacity);
    }
    batch
}
