//! Chat service endpoint configuration.

use parlor_core::{RoomId, Username};

/// Base URLs of the chat service, passed in explicitly at construction
/// instead of living in ambient global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    http_base: String,
    ws_base: String,
}

impl Endpoints {
    /// Create endpoint configuration from HTTP and WebSocket base URLs.
    ///
    /// Trailing slashes are stripped so path joining stays uniform.
    pub fn new(http_base: impl Into<String>, ws_base: impl Into<String>) -> Self {
        let http_base = http_base.into().trim_end_matches('/').to_owned();
        let ws_base = ws_base.into().trim_end_matches('/').to_owned();
        Self { http_base, ws_base }
    }

    /// HTTP base URL.
    pub fn http_base(&self) -> &str {
        &self.http_base
    }

    /// WebSocket base URL.
    pub fn ws_base(&self) -> &str {
        &self.ws_base
    }

    pub(crate) fn rooms_url(&self) -> String {
        format!("{}/chat/rooms", self.http_base)
    }

    pub(crate) fn room_url(&self, room_id: &RoomId) -> String {
        format!("{}/chat/rooms/{room_id}", self.http_base)
    }

    pub(crate) fn messages_url(&self, room_id: &RoomId) -> String {
        format!("{}/chat/rooms/{room_id}/messages", self.http_base)
    }

    pub(crate) fn stream_url(&self, room_id: &RoomId, username: &Username) -> String {
        format!("{}/ws/{room_id}/{username}", self.ws_base)
    }
}
