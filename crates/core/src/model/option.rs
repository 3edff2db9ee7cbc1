use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::ids::AnswerId;

//
// ─── OPTION STATE ──────────────────────────────────────────────────────────────
//

/// Display state of a selectable sound option.
///
/// - `Neutral`: no marking, the baseline between checkpoints
/// - `Heard`: auditioned to its natural end during the pre-listen phase
/// - `Locked`: not currently clickable (narration playing, or quiz over)
/// - `Correct`: picked as the right answer for the active checkpoint
/// - `Wrong`: picked, but not the expected answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionState {
    Neutral,
    Heard,
    Locked,
    Correct,
    Wrong,
}

impl OptionState {
    /// Wire form consumed by a display layer.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OptionState::Neutral => "neutral",
            OptionState::Heard => "heard",
            OptionState::Locked => "locked",
            OptionState::Correct => "correct",
            OptionState::Wrong => "wrong",
        }
    }
}

impl fmt::Display for OptionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── SOUND OPTION ──────────────────────────────────────────────────────────────
//

/// One selectable answer with its current display state.
///
/// Created at setup and kept until teardown; only the state changes, driven
/// by the gate (heard) and the player (locked/correct/wrong).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundOption {
    answer: AnswerId,
    state: OptionState,
}

impl SoundOption {
    #[must_use]
    pub fn new(answer: AnswerId) -> Self {
        Self {
            answer,
            state: OptionState::Neutral,
        }
    }

    #[must_use]
    pub fn answer(&self) -> &AnswerId {
        &self.answer
    }

    #[must_use]
    pub fn state(&self) -> OptionState {
        self.state
    }

    pub fn set_state(&mut self, state: OptionState) {
        self.state = state;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_start_neutral() {
        let option = SoundOption::new(AnswerId::new("Sprite"));
        assert_eq!(option.state(), OptionState::Neutral);
        assert_eq!(option.answer().as_str(), "Sprite");
    }

    #[test]
    fn wire_form_is_lowercase() {
        assert_eq!(OptionState::Neutral.as_str(), "neutral");
        assert_eq!(OptionState::Heard.to_string(), "heard");
        assert_eq!(OptionState::Wrong.as_str(), "wrong");
    }

    #[test]
    fn state_can_be_updated() {
        let mut option = SoundOption::new(AnswerId::new("Chips"));
        option.set_state(OptionState::Correct);
        assert_eq!(option.state(), OptionState::Correct);
    }
}
