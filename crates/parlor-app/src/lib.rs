//! Application layer for the parlor chat client.
//!
//! Composes the sans-IO core and the IO layer into one room session,
//! following the split between a pure state machine and the runtime that
//! drives it:
//!
//! - [`Session`]: pure state machine over the active room lifecycle
//!   (Idle → Activating → Active → Deactivating → Idle). It consumes
//!   epoch-tagged [`SessionEvent`] inputs and owns the message store and
//!   presence notifier. Fully testable without I/O.
//! - [`RoomSyncController`]: async orchestrator that owns the streaming
//!   connection and the in-flight history fetch, pumps their completions
//!   into the session in arrival order, and exposes the read-only
//!   [`RoomView`] plus the `send_message` / `activate_room` /
//!   `deactivate_room` commands to the presentation layer.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod controller;
mod event;
mod session;
mod view;

pub use controller::RoomSyncController;
pub use event::SessionEvent;
pub use parlor_client::Endpoints;
pub use parlor_core::{ChatMessage, ConnectionStatus, RoomId, TimelineItem, Username, timeline};
pub use session::{Phase, Session};
pub use view::RoomView;
