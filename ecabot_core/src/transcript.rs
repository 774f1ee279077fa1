//! Append-only transcript with the session's pending flag.
//!
//! The transcript lives inside a `tokio::sync::watch` channel so observers
//! (the rendering layer) are woken on every change, and so the pending flag
//! and the reply turn can be updated under one write lock.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tracing::debug;

use crate::{Role, Turn, prompt::GREETING};

/// Ordered log of turns plus whether a request is outstanding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<Turn>,
    pending: bool,
}

impl Transcript {
    /// A transcript holding only the greeting turn.
    #[must_use]
    pub fn seeded() -> Self {
        Self {
            turns: vec![Turn::assistant(GREETING)],
            pending: false,
        }
    }

    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Always false: the greeting is never removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending
    }

    /// True while nothing but the greeting has been exchanged.
    #[must_use]
    pub fn is_cold_start(&self) -> bool {
        self.turns.len() == 1
    }

    #[must_use]
    pub fn count(&self, role: Role) -> usize {
        self.turns.iter().filter(|t| t.role == role).count()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::seeded()
    }
}

/// Shared handle to one session's transcript.
///
/// Cloning the store shares the same transcript; there are no edit or
/// removal operations. Once [`close`](Self::close) has run, no further turn
/// is accepted.
#[derive(Debug, Clone)]
pub struct TranscriptStore {
    tx: Arc<watch::Sender<Transcript>>,
    closed: Arc<AtomicBool>,
}

impl TranscriptStore {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Transcript::seeded());
        Self {
            tx: Arc::new(tx),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Append a turn at the end and notify observers.
    pub fn append(&self, turn: Turn) {
        debug!(role = ?turn.role, len = turn.text.len(), "Appending turn");
        self.tx.send_modify(|t| t.turns.push(turn));
    }

    /// Append the user turn and raise the pending flag, unless a request is
    /// already outstanding. Returns whether the turn was accepted.
    pub fn begin_request(&self, user_turn: Turn) -> bool {
        self.tx.send_if_modified(|t| {
            if t.pending || self.is_closed() {
                return false;
            }
            t.turns.push(user_turn);
            t.pending = true;
            true
        })
    }

    /// Append the reply and clear the pending flag in one step.
    ///
    /// Returns `false` and leaves the transcript untouched once the store is
    /// closed. The flag is read under the write lock.
    pub fn settle(&self, reply: Turn) -> bool {
        self.tx.send_if_modified(|t| {
            if self.is_closed() {
                return false;
            }
            t.turns.push(reply);
            t.pending = false;
            true
        })
    }

    /// Stop accepting turns. Does not take the write lock, so it never waits
    /// on an observer holding a borrow.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn snapshot(&self) -> Transcript {
        self.tx.borrow().clone()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.tx.borrow().pending
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tx.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tx.borrow().is_empty()
    }

    #[must_use]
    pub fn is_cold_start(&self) -> bool {
        self.tx.borrow().is_cold_start()
    }

    /// Receiver that is marked changed on every append or settle.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Transcript> {
        self.tx.subscribe()
    }
}

impl Default for TranscriptStore {
    fn default() -> Self {
        Self::new()
    }
}
