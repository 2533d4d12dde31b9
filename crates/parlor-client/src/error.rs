//! Error taxonomy for the IO layer.
//!
//! Three failure classes with distinct propagation policies: retrieval
//! failures surface to the presentation layer as a one-time notice,
//! connection failures become a persistent `Failed` status, and malformed
//! frames are always handled locally (logged and dropped, one bad frame
//! never aborts the connection). No error here is fatal to the process.

use thiserror::Error;

/// History fetch or room directory request failed.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// Network-level failure or non-success HTTP status.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not match the expected shape.
    #[error("response malformed: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The streaming channel failed to open or dropped unexpectedly.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// WebSocket handshake or transport failure.
    #[error("websocket transport failed: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),

    /// An outbound frame could not be encoded.
    #[error("outbound frame encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// An individual inbound frame that could not be parsed.
#[derive(Debug, Error)]
#[error("malformed frame: {0}")]
pub struct MalformedFrameError(#[from] serde_json::Error);
