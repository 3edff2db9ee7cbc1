//! Collaborator seams around the engine.
//!
//! Everything the quiz touches in the outside world sits behind one of
//! these traits: the narration timeline, one audio clip per option, the
//! display surface, and the one-shot resume timer. All of them are
//! synchronous; the whole system is single-threaded and event-driven, so
//! implementations run to completion before the next event is processed.

use std::time::Duration;

use quiz_core::command::PlayLabel;
use quiz_core::model::{AnswerId, OptionState};
use quiz_core::status::StatusLine;

/// The single narration timeline, exclusively owned by the engine.
pub trait MediaTimeline {
    /// Start or resume playback. Best effort: a platform refusal (e.g.
    /// user-gesture policy) is swallowed and simply never produces a
    /// started event.
    fn play(&mut self);

    fn pause(&mut self);

    /// Move the playhead to an absolute position in seconds.
    fn seek(&mut self, position: f64);

    /// Current playhead position in seconds.
    fn position(&self) -> f64;

    /// Total duration in seconds, when known.
    fn duration(&self) -> Option<f64>;
}

/// One option's audio clip.
pub trait OptionClip {
    /// Restart the clip from the beginning. Best effort, like
    /// [`MediaTimeline::play`].
    fn play(&mut self);

    /// Stop the clip and rewind it to position 0.
    fn rewind(&mut self);
}

/// Display surface receiving status text, option states, progress and
/// affordance toggles. Purely an output; it never calls back.
pub trait QuizDisplay {
    fn status(&mut self, line: &StatusLine);
    fn option_state(&mut self, answer: &AnswerId, state: OptionState);
    fn progress(&mut self, percent: f64);
    fn play_enabled(&mut self, enabled: bool);
    fn replay_enabled(&mut self, enabled: bool);
    fn play_label(&mut self, label: PlayLabel);
}

/// One-shot timer for the delayed auto-resume after a correct answer.
///
/// The host calls [`crate::QuizEngine::resume_due`] when the timer fires.
/// A timer that outlives a cancel (or the engine's teardown) and fires
/// anyway is harmless: the engine ignores stale firings.
pub trait ResumeScheduler {
    fn schedule(&mut self, delay: Duration);
    fn cancel(&mut self);
}
