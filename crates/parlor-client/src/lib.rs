//! IO layer for the parlor chat client.
//!
//! Two independent data sources feed the sans-IO core in `parlor-core`:
//!
//! - [`Connection`]: a live WebSocket channel delivering message and
//!   presence frames for one room+user pair, with explicit lifecycle
//!   status ([`parlor_core::ConnectionStatus`]) and no auto-reconnect.
//! - [`HistoryLoader`]: a one-shot REST fetch of recent room history,
//!   normalized to ascending timestamp order.
//!
//! [`RoomDirectory`] covers the room listing/creation endpoints, which sit
//! outside the reconciliation core but share the same REST error taxonomy.
//!
//! Endpoints are explicit construction parameters ([`Endpoints`]); nothing
//! here reads ambient global state.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod endpoints;
mod error;
mod history;
mod rooms;
mod transport;

pub use endpoints::Endpoints;
pub use error::{ConnectionError, MalformedFrameError, RetrievalError};
pub use history::HistoryLoader;
pub use parlor_core::{ChatMessage, ClientFrame, ConnectionStatus, RoomId, ServerFrame, Username};
pub use rooms::RoomDirectory;
pub use transport::{Connection, ConnectionEvent};
