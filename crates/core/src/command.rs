//! Typed commands emitted by the state machines.
//!
//! The gate and the player never touch a timeline, a clip, or a screen
//! directly: they return lists of [`Command`]s and the engine translates
//! each into a collaborator call. This keeps both machines pure and makes
//! every transition assertable in tests.

use crate::model::{AnswerId, OptionState};
use crate::status::StatusLine;

/// Control for the single narration timeline.
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineCommand {
    Play,
    Pause,
    /// Move the playhead to an absolute position in seconds.
    Seek(f64),
}

/// Control for one option's audio clip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipCommand {
    /// Restart the clip from the beginning (best effort).
    Play,
    /// Stop the clip and rewind it to position 0.
    Rewind,
}

/// Caption of the play affordance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayLabel {
    Play,
    Replay,
}

impl PlayLabel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PlayLabel::Play => "Play",
            PlayLabel::Replay => "Replay",
        }
    }
}

/// Update for the display collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCommand {
    Status(StatusLine),
    OptionState(AnswerId, OptionState),
    /// Put every option into the same state.
    AllOptions(OptionState),
    /// Return every option to the neutral baseline.
    ResetOptions,
    PlayEnabled(bool),
    ReplayEnabled(bool),
    PlayLabel(PlayLabel),
    /// Progress percentage in 0..=100.
    Progress(f64),
}

/// One instruction for the engine to apply to a collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Timeline(TimelineCommand),
    Clip(AnswerId, ClipCommand),
    /// Rewind and silence every clip except the named one.
    StopOtherClips(AnswerId),
    /// Rewind and silence every clip.
    StopAllClips,
    Display(DisplayCommand),
    /// Arm the one-shot delayed-resume timer.
    ScheduleResume,
}

impl Command {
    #[must_use]
    pub fn status(line: StatusLine) -> Self {
        Command::Display(DisplayCommand::Status(line))
    }

    #[must_use]
    pub fn option_state(answer: AnswerId, state: OptionState) -> Self {
        Command::Display(DisplayCommand::OptionState(answer, state))
    }

    #[must_use]
    pub fn all_options(state: OptionState) -> Self {
        Command::Display(DisplayCommand::AllOptions(state))
    }

    #[must_use]
    pub fn play_enabled(enabled: bool) -> Self {
        Command::Display(DisplayCommand::PlayEnabled(enabled))
    }

    #[must_use]
    pub fn replay_enabled(enabled: bool) -> Self {
        Command::Display(DisplayCommand::ReplayEnabled(enabled))
    }

    #[must_use]
    pub fn progress(percent: f64) -> Self {
        Command::Display(DisplayCommand::Progress(percent))
    }
}
