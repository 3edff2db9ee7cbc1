//! Pre-listen gate: every sound sample must play to its natural end once
//! before the main quiz unlocks.

use crate::command::{ClipCommand, Command, DisplayCommand};
use crate::model::{AnswerId, GateSession, OptionState};
use crate::status::StatusLine;

/// Tracks which samples have been fully auditioned and unlocks the player
/// once all of them have.
///
/// Only *natural* clip completion counts: an audition that stops another
/// clip mid-way rewinds it without marking it heard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreListenGate {
    options: Vec<AnswerId>,
    session: GateSession,
}

impl PreListenGate {
    #[must_use]
    pub fn new(options: Vec<AnswerId>) -> Self {
        let total = options.len();
        Self {
            options,
            session: GateSession::new(total),
        }
    }

    fn knows(&self, answer: &AnswerId) -> bool {
        self.options.iter().any(|option| option == answer)
    }

    /// Restart `answer`'s clip from the beginning, silencing every other
    /// clip first. Unknown answers are ignored; re-auditioning an
    /// already-heard option is harmless.
    pub fn audition(&mut self, answer: &AnswerId) -> Vec<Command> {
        if !self.knows(answer) {
            return Vec::new();
        }
        vec![
            Command::StopOtherClips(answer.clone()),
            Command::Clip(answer.clone(), ClipCommand::Play),
        ]
    }

    /// A clip reached its natural end.
    ///
    /// The first completion per answer marks it heard and reports progress;
    /// hearing the final answer completes the gate exactly once: unlock the
    /// play affordance and reset every option to a silent, neutral baseline.
    pub fn clip_finished(&mut self, answer: &AnswerId) -> Vec<Command> {
        if !self.knows(answer) || self.session.is_completed() {
            return Vec::new();
        }
        if !self.session.record_heard(answer) {
            return Vec::new();
        }

        let mut out = vec![Command::option_state(answer.clone(), OptionState::Heard)];
        let remaining = self.session.remaining();
        if remaining > 0 {
            out.push(Command::status(StatusLine::GateProgress {
                heard: self.session.heard_count(),
                total: self.session.total(),
                remaining,
            }));
        } else {
            self.session.complete();
            out.push(Command::status(StatusLine::GateComplete));
            out.push(Command::play_enabled(true));
            out.push(Command::Display(DisplayCommand::ResetOptions));
            out.push(Command::StopAllClips);
        }
        out
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.session.is_completed()
    }

    #[must_use]
    pub fn heard_count(&self) -> usize {
        self.session.heard_count()
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.session.remaining()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.session.total()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::TimelineCommand;

    fn gate(labels: &[&str]) -> PreListenGate {
        PreListenGate::new(labels.iter().map(|label| AnswerId::new(*label)).collect())
    }

    fn contains_status(commands: &[Command], wanted: &StatusLine) -> bool {
        commands
            .iter()
            .any(|c| matches!(c, Command::Display(DisplayCommand::Status(line)) if line == wanted))
    }

    #[test]
    fn audition_restarts_clip_and_silences_the_rest() {
        let mut gate = gate(&["A", "B"]);
        let commands = gate.audition(&AnswerId::new("A"));

        assert_eq!(
            commands,
            vec![
                Command::StopOtherClips(AnswerId::new("A")),
                Command::Clip(AnswerId::new("A"), ClipCommand::Play),
            ]
        );
    }

    #[test]
    fn audition_alone_never_marks_heard() {
        let mut gate = gate(&["A", "B"]);
        gate.audition(&AnswerId::new("A"));
        gate.audition(&AnswerId::new("B"));

        assert_eq!(gate.heard_count(), 0);
        assert!(!gate.is_complete());
    }

    #[test]
    fn natural_completion_marks_heard_and_reports_progress() {
        let mut gate = gate(&["A", "B", "C"]);
        let commands = gate.clip_finished(&AnswerId::new("B"));

        assert_eq!(
            commands[0],
            Command::option_state(AnswerId::new("B"), OptionState::Heard)
        );
        assert!(contains_status(
            &commands,
            &StatusLine::GateProgress {
                heard: 1,
                total: 3,
                remaining: 2
            }
        ));
        assert_eq!(gate.remaining(), 2);
    }

    #[test]
    fn repeat_completion_is_idempotent() {
        let mut gate = gate(&["A", "B"]);
        gate.clip_finished(&AnswerId::new("A"));
        let second = gate.clip_finished(&AnswerId::new("A"));

        assert!(second.is_empty());
        assert_eq!(gate.heard_count(), 1);
    }

    #[test]
    fn hearing_every_option_completes_the_gate_exactly_once() {
        let mut gate = gate(&["A", "B"]);
        gate.clip_finished(&AnswerId::new("A"));
        let commands = gate.clip_finished(&AnswerId::new("B"));

        assert!(gate.is_complete());
        assert!(contains_status(&commands, &StatusLine::GateComplete));
        assert!(commands.contains(&Command::play_enabled(true)));
        assert!(commands.contains(&Command::Display(DisplayCommand::ResetOptions)));
        assert!(commands.contains(&Command::StopAllClips));

        // Scenario D: a later finish must not re-fire completion.
        let after = gate.clip_finished(&AnswerId::new("A"));
        assert!(after.is_empty());
    }

    #[test]
    fn unknown_answers_are_ignored() {
        let mut gate = gate(&["A"]);
        assert!(gate.audition(&AnswerId::new("X")).is_empty());
        assert!(gate.clip_finished(&AnswerId::new("X")).is_empty());
        assert!(!gate.is_complete());
    }

    #[test]
    fn gate_never_emits_timeline_commands() {
        let mut gate = gate(&["A"]);
        let mut commands = gate.audition(&AnswerId::new("A"));
        commands.extend(gate.clip_finished(&AnswerId::new("A")));

        assert!(
            !commands
                .iter()
                .any(|c| matches!(c, Command::Timeline(TimelineCommand::Play)))
        );
    }
}
