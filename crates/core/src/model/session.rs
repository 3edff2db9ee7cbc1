use std::collections::HashSet;

use crate::model::ids::AnswerId;

//
// ─── PLAYBACK SESSION ──────────────────────────────────────────────────────────
//

/// Mutable playback state owned solely by the checkpoint player.
///
/// Invariants (upheld by the player, never by callers):
/// - `active_checkpoint.is_some()` implies `interaction_locked == false`
///   and narration is paused
/// - `replaying_segment` implies playback is heading back toward the active
///   checkpoint's timestamp with interaction locked
/// - `next_checkpoint` never decreases except through [`restart`](Self::restart)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackSession {
    /// Next checkpoint not yet reached (0..=N).
    pub next_checkpoint: usize,
    /// Checkpoint currently awaiting an answer, if any.
    pub active_checkpoint: Option<usize>,
    /// Replaying the segment leading into the active checkpoint.
    pub replaying_segment: bool,
    /// Whether answer clicks are currently ignored.
    pub interaction_locked: bool,
    /// A correct answer was accepted and the delayed auto-resume is armed.
    pub pending_resume: bool,
}

impl PlaybackSession {
    /// Fresh session: nothing reached, choices locked until the first
    /// checkpoint opens them.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_checkpoint: 0,
            active_checkpoint: None,
            replaying_segment: false,
            interaction_locked: true,
            pending_resume: false,
        }
    }

    /// Rewind the session for a replay from the top of the timeline.
    pub fn restart(&mut self) {
        self.next_checkpoint = 0;
        self.active_checkpoint = None;
        self.replaying_segment = false;
        self.pending_resume = false;
    }
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self::new()
    }
}

//
// ─── GATE SESSION ──────────────────────────────────────────────────────────────
//

/// Pre-listen progress: which options have played to their natural end.
///
/// The heard set only grows; once every option has been heard the session
/// latches completed for good.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateSession {
    heard: HashSet<AnswerId>,
    total: usize,
    completed: bool,
}

impl GateSession {
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self {
            heard: HashSet::new(),
            total,
            completed: false,
        }
    }

    /// Records a clip that finished naturally. Returns `true` only the first
    /// time an answer is heard.
    pub fn record_heard(&mut self, answer: &AnswerId) -> bool {
        self.heard.insert(answer.clone())
    }

    /// Latch the gate as satisfied. Irreversible for the session.
    pub fn complete(&mut self) {
        self.completed = true;
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn heard_count(&self) -> usize {
        self.heard.len()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.heard.len())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
