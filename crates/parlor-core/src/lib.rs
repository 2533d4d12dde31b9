//! Core domain logic for the parlor chat client.
//!
//! Sans-IO building blocks for keeping a bounded, ordered view of a chat
//! room's recent messages consistent across a REST history snapshot and a
//! live streaming feed. Nothing in this crate performs I/O or owns a
//! runtime: time is passed into methods as a parameter, and the types here
//! are driven by the IO layers in `parlor-client` and `parlor-app`.
//!
//! # Components
//!
//! - [`MessageStore`]: bounded, ordered, de-duplicated message window
//! - [`PresenceNotifier`]: FIFO queue of self-expiring join/leave notices
//! - [`timeline`]: pure date-separator derivation over a store snapshot
//! - [`ConnectionStatus`]: lifecycle states of the streaming connection
//! - [`ServerFrame`] / [`ClientFrame`]: JSON wire frames

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod connection;
mod ids;
mod message;
mod presence;
mod store;
mod timeline;
mod wire;

pub use connection::ConnectionStatus;
pub use ids::{IdentityError, RoomId, Username};
pub use message::{ChatMessage, MessageId, RoomInfo};
pub use presence::{NOTICE_TTL, PresenceEvent, PresenceKind, PresenceNotifier};
pub use store::{DEFAULT_CAPACITY, MessageStore};
pub use timeline::{TimelineItem, timeline};
pub use wire::{ClientFrame, ServerFrame};
