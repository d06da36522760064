//! One-shot auto-select latch.
//!
//! `Waiting -> Armed -> Spent`. A static list starts armed. A streamed list waits for the settled
//! update. The first recompute while armed decides: exactly one match fires, anything else
//! spends the latch without firing. A spent latch never re-arms.

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOneLatch {
    Waiting,
    Armed,
    Spent,
}

impl SelectOneLatch {
    /// Initial state for a session. Without `select_one` the latch is born spent.
    pub fn new(select_one: bool, streaming: bool) -> Self {
        match (select_one, streaming) {
            (false, _) => SelectOneLatch::Spent,
            (true, true) => SelectOneLatch::Waiting,
            (true, false) => SelectOneLatch::Armed,
        }
    }

    /// The source list has settled.
    pub fn arm(&mut self) {
        if *self == SelectOneLatch::Waiting {
            debug!(target: "session.latch", "armed");
            *self = SelectOneLatch::Armed;
        }
    }

    /// Observe a recompute; returns true when the session should finish on its own.
    pub fn observe(&mut self, match_count: usize) -> bool {
        if *self != SelectOneLatch::Armed {
            return false;
        }
        *self = SelectOneLatch::Spent;
        let fire = match_count == 1;
        debug!(target: "session.latch", match_count, fire, "spent");
        fire
    }
}
