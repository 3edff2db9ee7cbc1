use std::fmt;

/// Every user-facing status line the quiz can show, as data.
///
/// The display collaborator receives these and renders `Display` output (or
/// localizes them); the state machines never format strings themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLine {
    /// Pre-listen progress after a clip finished naturally.
    GateProgress {
        heard: usize,
        total: usize,
        remaining: usize,
    },
    /// All samples heard; the quiz is unlocked.
    GateComplete,
    /// Narration is advancing.
    Playing,
    /// Paused at a checkpoint, waiting for the matching sound.
    Checkpoint { index: usize, total: usize },
    /// Re-listening to the segment leading into the active checkpoint.
    ReplayingSegment { index: usize },
    Correct,
    Wrong,
    /// The timeline was rewound for a full replay.
    RestartedFromBeginning,
    /// Narration reached its natural end.
    Finished,
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusLine::GateProgress {
                heard,
                total,
                remaining,
            } => write!(
                f,
                "Great! {heard}/{total} heard. Listen to {remaining} more to continue."
            ),
            StatusLine::GateComplete => write!(
                f,
                "Perfect! You've heard all sounds. Press Play to start the story."
            ),
            StatusLine::Playing => write!(f, "Playing... listen carefully."),
            StatusLine::Checkpoint { index, total } => write!(
                f,
                "Checkpoint {}/{}. Pick the right sound to continue.",
                index + 1,
                total
            ),
            StatusLine::ReplayingSegment { index } => write!(
                f,
                "Replaying the segment before checkpoint {}...",
                index + 1
            ),
            StatusLine::Correct => write!(f, "Correct! Resuming…"),
            StatusLine::Wrong => write!(f, "Not quite. Try another."),
            StatusLine::RestartedFromBeginning => write!(f, "Replaying from start."),
            StatusLine::Finished => {
                write!(f, "Narration finished. Great job! You nailed the choices.")
            }
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_progress_counts_render() {
        let line = StatusLine::GateProgress {
            heard: 2,
            total: 6,
            remaining: 4,
        };
        assert_eq!(
            line.to_string(),
            "Great! 2/6 heard. Listen to 4 more to continue."
        );
    }

    #[test]
    fn checkpoint_prompt_is_one_based() {
        let line = StatusLine::Checkpoint { index: 0, total: 6 };
        assert_eq!(
            line.to_string(),
            "Checkpoint 1/6. Pick the right sound to continue."
        );
    }

    #[test]
    fn replay_prompt_names_the_checkpoint() {
        let line = StatusLine::ReplayingSegment { index: 2 };
        assert_eq!(
            line.to_string(),
            "Replaying the segment before checkpoint 3..."
        );
    }

    #[test]
    fn fixed_lines_render() {
        assert_eq!(StatusLine::Wrong.to_string(), "Not quite. Try another.");
        assert_eq!(StatusLine::Correct.to_string(), "Correct! Resuming…");
        assert_eq!(
            StatusLine::RestartedFromBeginning.to_string(),
            "Replaying from start."
        );
    }
}
