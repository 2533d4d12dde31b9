//! Async orchestration of one room session.

use std::time::{Duration, Instant};

use parlor_client::{Connection, ConnectionEvent, Endpoints, HistoryLoader};
use parlor_core::{ClientFrame, DEFAULT_CAPACITY, NOTICE_TTL, RoomId, TimelineItem, Username, timeline};
use tokio::sync::mpsc;

use crate::{Phase, Session, SessionEvent, view::RoomView};

const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Composes the history loader, streaming connection, message store, and
/// presence notifier behind one presentation boundary.
///
/// On activation the history fetch and the connection handshake race; both
/// completions come back as epoch-tagged [`SessionEvent`]s, so a completion
/// for a superseded room is discarded rather than cancelled. All
/// completions are applied strictly in arrival order by
/// [`process_cycle`](Self::process_cycle), which the presentation layer
/// drives in its event loop.
#[derive(Debug)]
pub struct RoomSyncController {
    endpoints: Endpoints,
    session: Session,
    history: HistoryLoader,
    connection: Option<Connection>,
    events_tx: mpsc::Sender<SessionEvent>,
    events_rx: mpsc::Receiver<SessionEvent>,
}

impl RoomSyncController {
    /// Create an idle controller for the given service and local user.
    pub fn new(endpoints: Endpoints, local_user: Username) -> Self {
        Self::with_limits(endpoints, local_user, DEFAULT_CAPACITY, NOTICE_TTL)
    }

    /// Create a controller with custom window capacity and notice delay.
    pub fn with_limits(
        endpoints: Endpoints,
        local_user: Username,
        capacity: usize,
        notice_ttl: Duration,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            history: HistoryLoader::with_capacity(endpoints.clone(), capacity),
            endpoints,
            session: Session::with_limits(local_user, capacity, notice_ttl),
            connection: None,
            events_tx,
            events_rx,
        }
    }

    /// Activate a room: tear down any previous session, then start the
    /// history fetch and the streaming connection concurrently.
    ///
    /// Must be called within a tokio runtime.
    pub fn activate_room(&mut self, room: RoomId) {
        self.deactivate_room();

        let epoch = self.session.activate(room.clone());
        tracing::debug!(%room, epoch, "activating room");

        let loader = self.history.clone();
        let events = self.events_tx.clone();
        let fetch_room = room.clone();
        tokio::spawn(async move {
            let event = match loader.fetch(&fetch_room).await {
                Ok(messages) => SessionEvent::HistoryLoaded { epoch, messages },
                Err(error) => SessionEvent::HistoryFailed { epoch, reason: error.to_string() },
            };
            let _ = events.send(event).await;
        });

        self.connection =
            Some(Connection::open(&self.endpoints, &room, self.session.local_user()));
    }

    /// Deactivate the current room, if any: close the connection and
    /// discard the session's store and notices.
    pub fn deactivate_room(&mut self) {
        if self.session.phase() == Phase::Idle {
            return;
        }
        tracing::debug!("deactivating room");
        self.session.begin_deactivate();
        if let Some(mut connection) = self.connection.take() {
            connection.close();
        }
        self.session.finish_deactivate();
    }

    /// Send a chat message to the active room.
    ///
    /// A no-op unless the session is active with an open connection; the
    /// presentation layer disables its send affordance from
    /// [`RoomView::can_send`] before this gate applies. Whitespace-only
    /// input is ignored.
    pub fn send_message(&self, text: &str) {
        let content = text.trim();
        if content.is_empty() {
            return;
        }
        if !self.session.can_send() {
            tracing::debug!("send suppressed: session not active or connection not open");
            return;
        }
        if let Some(connection) = &self.connection {
            connection.send(ClientFrame::Message {
                content: content.to_owned(),
                sender: self.session.local_user().to_string(),
            });
        }
    }

    /// Wait for the next completion (a history result, a connection
    /// event, or a notice expiry) and apply it to the session.
    ///
    /// Pends until something happens; drive it from the host event loop.
    pub async fn process_cycle(&mut self) {
        let deadline = self.session.next_notice_deadline().map(tokio::time::Instant::from_std);
        tokio::select! {
            Some(event) = self.events_rx.recv() => {
                self.session.handle(event, Instant::now());
            },
            Some(event) = next_connection_event(&mut self.connection) => {
                let epoch = self.session.epoch();
                let event = match event {
                    ConnectionEvent::Status(status) => SessionEvent::Status { epoch, status },
                    ConnectionEvent::Frame(frame) => SessionEvent::Frame { epoch, frame },
                };
                self.session.handle(event, Instant::now());
            },
            () = sleep_until_deadline(deadline) => {
                self.session.expire_notices(Instant::now());
            },
        }
    }

    /// Read-only composite view of the active room.
    pub fn view(&self) -> RoomView {
        self.session.view()
    }

    /// Renderable timeline of the message window with date separators.
    pub fn timeline(&self) -> Vec<TimelineItem<'_>> {
        timeline(self.session.messages())
    }
}

async fn next_connection_event(connection: &mut Option<Connection>) -> Option<ConnectionEvent> {
    match connection {
        Some(connection) => connection.next_event().await,
        None => std::future::pending().await,
    }
}

async fn sleep_until_deadline(deadline: Option<tokio::time::Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
