//! Transient presence notices with FIFO self-expiry.

use std::{
    collections::VecDeque,
    ops::Add,
    time::{Duration, Instant},
};

use crate::ids::Username;

/// How long a presence notice stays visible.
pub const NOTICE_TTL: Duration = Duration::from_millis(3000);

/// Kind of presence transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceKind {
    /// Participant joined the room.
    Joined,
    /// Participant left the room.
    Left,
}

impl PresenceKind {
    fn verb(self) -> &'static str {
        match self {
            Self::Joined => "joined",
            Self::Left => "left",
        }
    }
}

/// A transient join/leave fact about a room participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceEvent {
    /// Participant the event is about.
    pub username: String,
    /// Whether they joined or left.
    pub kind: PresenceKind,
}

#[derive(Debug, Clone)]
struct Notice<I> {
    text: String,
    expires_at: I,
}

/// FIFO queue of presence notices, each expiring a fixed delay after
/// enqueue.
///
/// Expiry is an explicit deadline queue rather than one timer per notice:
/// [`expire`](Self::expire) removes expired heads and
/// [`next_deadline`](Self::next_deadline) tells the driver when to wake up
/// next, so deactivating a room cancels every pending expiry by dropping or
/// [`clear`](Self::clear)ing the notifier. FIFO removal is sound because all
/// notices share one delay, so deadlines are monotone in enqueue order.
///
/// Generic over the instant type to support virtual time in tests.
#[derive(Debug, Clone)]
pub struct PresenceNotifier<I = Instant> {
    local_user: Username,
    ttl: Duration,
    notices: VecDeque<Notice<I>>,
}

impl<I> PresenceNotifier<I>
where
    I: Copy + Ord + Add<Duration, Output = I>,
{
    /// Create a notifier for the given local user with the default delay.
    pub fn new(local_user: Username) -> Self {
        Self::with_ttl(local_user, NOTICE_TTL)
    }

    /// Create a notifier with a custom visibility delay.
    pub fn with_ttl(local_user: Username, ttl: Duration) -> Self {
        Self { local_user, ttl, notices: VecDeque::new() }
    }

    /// Enqueue a notice for a presence event.
    ///
    /// Events about the local user are suppressed. Returns whether a notice
    /// was enqueued.
    pub fn notify(&mut self, event: PresenceEvent, now: I) -> bool {
        if event.username == self.local_user.as_str() {
            return false;
        }
        let text = format!("{} {} the room", event.username, event.kind.verb());
        self.notices.push_back(Notice { text, expires_at: now + self.ttl });
        true
    }

    /// Remove every notice whose deadline has passed.
    pub fn expire(&mut self, now: I) {
        while self.notices.front().is_some_and(|n| n.expires_at <= now) {
            self.notices.pop_front();
        }
    }

    /// Deadline of the oldest notice, if any.
    pub fn next_deadline(&self) -> Option<I> {
        self.notices.front().map(|n| n.expires_at)
    }

    /// Currently visible notices, oldest first.
    pub fn active_notices(&self) -> impl Iterator<Item = &str> {
        self.notices.iter().map(|n| n.text.as_str())
    }

    /// Number of visible notices.
    pub fn len(&self) -> usize {
        self.notices.len()
    }

    /// Whether no notices are visible.
    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    /// Drop all notices, cancelling their pending expiries.
    pub fn clear(&mut self) {
        self.notices.clear();
    }
}
