//! Room directory REST endpoints.
//!
//! Listing, lookup, and creation of rooms sit outside the room
//! reconciliation core; they are plain request/response collaborators
//! sharing the [`RetrievalError`] taxonomy.

use parlor_core::{RoomId, RoomInfo};
use serde_json::json;

use crate::{Endpoints, error::RetrievalError};

/// Client for the room listing, lookup, and creation endpoints.
#[derive(Debug, Clone)]
pub struct RoomDirectory {
    http: reqwest::Client,
    endpoints: Endpoints,
}

impl RoomDirectory {
    /// Create a directory client for the given endpoints.
    pub fn new(endpoints: Endpoints) -> Self {
        Self { http: reqwest::Client::new(), endpoints }
    }

    /// List all rooms, in server order.
    pub async fn list_rooms(&self) -> Result<Vec<RoomInfo>, RetrievalError> {
        let body =
            self.http.get(self.endpoints.rooms_url()).send().await?.error_for_status()?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Look up a single room, typically for its display name.
    pub async fn fetch_room(&self, room_id: &RoomId) -> Result<RoomInfo, RetrievalError> {
        let body = self
            .http
            .get(self.endpoints.room_url(room_id))
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Create a room with the given name and return its directory record.
    pub async fn create_room(&self, name: &str) -> Result<RoomInfo, RetrievalError> {
        let body = self
            .http
            .post(self.endpoints.rooms_url())
            .json(&json!({ "name": name }))
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
