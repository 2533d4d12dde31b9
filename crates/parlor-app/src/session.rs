//! Room session state machine.
//!
//! Pure state machine over the active room lifecycle. No I/O: the
//! controller feeds it epoch-tagged [`SessionEvent`]s and the current time,
//! and reads back the derived [`RoomView`]. This keeps the merge and
//! lifecycle rules fully testable in isolation, in any interleaving of
//! history completion and stream arrival.

use std::time::{Duration, Instant};

use parlor_core::{
    ChatMessage, ConnectionStatus, DEFAULT_CAPACITY, MessageStore, NOTICE_TTL, PresenceEvent,
    PresenceKind, PresenceNotifier, RoomId, ServerFrame, Username,
};

use crate::{SessionEvent, view::RoomView};

/// Lifecycle phase of the room session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No active room.
    Idle,
    /// Room activated; history and connection-open still racing.
    Activating,
    /// Both initial history and the connection handshake have resolved.
    Active,
    /// Teardown in progress; resources being released.
    Deactivating,
}

/// State machine for one active room at a time.
///
/// Owns the message store and presence notifier exclusively; both are
/// discarded and replaced on every activation, so nothing leaks across
/// room transitions.
#[derive(Debug)]
pub struct Session {
    local_user: Username,
    capacity: usize,
    notice_ttl: Duration,
    phase: Phase,
    epoch: u64,
    room: Option<RoomId>,
    store: MessageStore,
    notifier: PresenceNotifier,
    connection: ConnectionStatus,
    history_resolved: bool,
    handshake_resolved: bool,
    loading_history: bool,
    history_error: Option<String>,
}

impl Session {
    /// Create an idle session for the given local user.
    pub fn new(local_user: Username) -> Self {
        Self::with_limits(local_user, DEFAULT_CAPACITY, NOTICE_TTL)
    }

    /// Create an idle session with custom window capacity and notice delay.
    pub fn with_limits(local_user: Username, capacity: usize, notice_ttl: Duration) -> Self {
        let notifier = PresenceNotifier::with_ttl(local_user.clone(), notice_ttl);
        Self {
            local_user,
            capacity,
            notice_ttl,
            phase: Phase::Idle,
            epoch: 0,
            room: None,
            store: MessageStore::new(capacity),
            notifier,
            connection: ConnectionStatus::Closed,
            history_resolved: false,
            handshake_resolved: false,
            loading_history: false,
            history_error: None,
        }
    }

    /// Activate a room, superseding any previous activation.
    ///
    /// Bumps the activation epoch and replaces the store and notifier.
    /// Returns the new epoch for tagging this activation's completions.
    pub fn activate(&mut self, room: RoomId) -> u64 {
        self.epoch += 1;
        self.phase = Phase::Activating;
        self.room = Some(room);
        self.store = MessageStore::new(self.capacity);
        self.notifier = PresenceNotifier::with_ttl(self.local_user.clone(), self.notice_ttl);
        self.connection = ConnectionStatus::Connecting;
        self.history_resolved = false;
        self.handshake_resolved = false;
        self.loading_history = true;
        self.history_error = None;
        self.epoch
    }

    /// Begin teardown: release the room's state.
    ///
    /// The controller closes the connection between this and
    /// [`finish_deactivate`](Self::finish_deactivate). Clearing the
    /// notifier cancels all pending notice expiries.
    pub fn begin_deactivate(&mut self) {
        self.phase = Phase::Deactivating;
        self.room = None;
        self.store.clear();
        self.notifier.clear();
        self.loading_history = false;
        self.history_error = None;
    }

    /// Complete teardown and return to idle.
    pub fn finish_deactivate(&mut self) {
        self.connection = ConnectionStatus::Closed;
        self.phase = Phase::Idle;
    }

    /// Apply one event at the given time.
    ///
    /// Events tagged with a superseded epoch are discarded: a stale history
    /// response for a previous room must have no observable effect.
    pub fn handle(&mut self, event: SessionEvent, now: Instant) {
        if event.epoch() != self.epoch || matches!(self.phase, Phase::Idle | Phase::Deactivating) {
            tracing::debug!(event_epoch = event.epoch(), epoch = self.epoch, "discarding stale event");
            return;
        }
        match event {
            SessionEvent::HistoryLoaded { messages, .. } => {
                self.store.load_history(messages);
                self.loading_history = false;
                self.history_resolved = true;
                self.try_enter_active();
            },
            SessionEvent::HistoryFailed { reason, .. } => {
                tracing::warn!(%reason, "history fetch failed");
                self.loading_history = false;
                self.history_error = Some(reason);
                self.history_resolved = true;
                self.try_enter_active();
            },
            SessionEvent::Status { status, .. } => {
                self.connection = status;
                if matches!(status, ConnectionStatus::Open | ConnectionStatus::Failed) {
                    self.handshake_resolved = true;
                }
                self.try_enter_active();
            },
            SessionEvent::Frame { frame, .. } => self.apply_frame(frame, now),
        }
    }

    /// Remove presence notices whose deadline has passed.
    pub fn expire_notices(&mut self, now: Instant) {
        self.notifier.expire(now);
    }

    /// Deadline of the oldest presence notice, if any.
    pub fn next_notice_deadline(&self) -> Option<Instant> {
        self.notifier.next_deadline()
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current activation epoch.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Local user identity this session was constructed with.
    pub fn local_user(&self) -> &Username {
        &self.local_user
    }

    /// Message window of the active room, oldest first.
    pub fn messages(&self) -> &[ChatMessage] {
        self.store.snapshot()
    }

    /// Whether a send would currently transmit.
    pub fn can_send(&self) -> bool {
        self.phase == Phase::Active && self.connection.can_send()
    }

    /// Derive the observable view of the current state.
    pub fn view(&self) -> RoomView {
        RoomView {
            room: self.room.clone(),
            messages: self.store.snapshot().to_vec(),
            connection: self.connection,
            notices: self.notifier.active_notices().map(str::to_owned).collect(),
            loading_history: self.loading_history,
            history_error: self.history_error.clone(),
            can_send: self.can_send(),
        }
    }

    fn apply_frame(&mut self, frame: ServerFrame, now: Instant) {
        match frame {
            ServerFrame::Message { message } => {
                self.store.append(message);
            },
            ServerFrame::Join { username } => {
                self.notifier.notify(PresenceEvent { username, kind: PresenceKind::Joined }, now);
            },
            ServerFrame::Leave { username } => {
                self.notifier.notify(PresenceEvent { username, kind: PresenceKind::Left }, now);
            },
        }
    }

    fn try_enter_active(&mut self) {
        if self.phase == Phase::Activating && self.history_resolved && self.handshake_resolved {
            self.phase = Phase::Active;
        }
    }
}
