//! Checkpoint playback state machine.
//!
//! One continuous narration timeline, cut into segments by checkpoint
//! timestamps. Playback pauses exactly on each checkpoint and only resumes
//! once the matching sound option is picked; the segment leading into the
//! active checkpoint can be re-listened to without advancing the question.

use crate::command::{Command, DisplayCommand, PlayLabel, TimelineCommand};
use crate::model::{AnswerId, CheckpointSchedule, OptionState, PlaybackSession};
use crate::status::StatusLine;

/// Arrival tolerance in seconds: position sampling is coarse, so a tick may
/// land slightly past a checkpoint. The player then snaps back exactly.
pub const DEFAULT_EPSILON_SECS: f64 = 0.05;

/// Duration assumed for progress reporting while the real one is unknown.
pub const DEFAULT_ASSUMED_DURATION_SECS: f64 = 80.0;

/// Delay between a correct answer and the automatic resume, leaving time
/// for the feedback to land before audio continues.
pub const DEFAULT_RESUME_DELAY_MS: u64 = 400;

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    /// Before the first play request.
    Idle,
    /// Timeline advancing (or about to), no checkpoint awaiting an answer.
    Playing,
    /// Paused exactly on a checkpoint, answers accepted.
    AwaitingAnswer,
    /// Heading back toward the active checkpoint, answers locked.
    ReplayingSegment,
    /// Timeline reached its natural end.
    Finished,
}

//
// ─── PLAYER ────────────────────────────────────────────────────────────────────
//

/// The checkpoint player. Pure: every operation returns the [`Command`]s to
/// apply, and all inputs arrive as explicit event calls.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckpointPlayer {
    schedule: CheckpointSchedule,
    session: PlaybackSession,
    state: PlayerState,
    epsilon: f64,
    assumed_duration: f64,
}

impl CheckpointPlayer {
    #[must_use]
    pub fn new(schedule: CheckpointSchedule) -> Self {
        Self {
            schedule,
            session: PlaybackSession::new(),
            state: PlayerState::Idle,
            epsilon: DEFAULT_EPSILON_SECS,
            assumed_duration: DEFAULT_ASSUMED_DURATION_SECS,
        }
    }

    /// Override the checkpoint arrival tolerance.
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Override the fallback duration used for progress reporting.
    #[must_use]
    pub fn with_assumed_duration(mut self, seconds: f64) -> Self {
        self.assumed_duration = seconds;
        self
    }

    #[must_use]
    pub fn state(&self) -> PlayerState {
        self.state
    }

    #[must_use]
    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    #[must_use]
    pub fn schedule(&self) -> &CheckpointSchedule {
        &self.schedule
    }

    // ─── User actions ──────────────────────────────────────────────────────

    /// Start or resume narration.
    ///
    /// No-op while a checkpoint is unanswered: playback can never skip past
    /// an open question. After the end (or once every checkpoint has been
    /// passed) the request rewinds everything for a full replay first.
    pub fn request_play(&mut self) -> Vec<Command> {
        if self.session.active_checkpoint.is_some() {
            return Vec::new();
        }

        let mut out = Vec::new();
        if self.state == PlayerState::Finished
            || self.session.next_checkpoint >= self.schedule.len()
        {
            self.session.restart();
            out.push(Command::Timeline(TimelineCommand::Seek(0.0)));
            out.push(Command::status(StatusLine::RestartedFromBeginning));
        }
        self.state = PlayerState::Playing;
        out.push(Command::Timeline(TimelineCommand::Play));
        out
    }

    /// Re-listen to the segment leading into the active checkpoint.
    ///
    /// Only meaningful while an answer is awaited; the question neither
    /// advances nor resets.
    pub fn request_replay_segment(&mut self) -> Vec<Command> {
        if self.state != PlayerState::AwaitingAnswer {
            return Vec::new();
        }
        let Some(active) = self.session.active_checkpoint else {
            return Vec::new();
        };
        let Some(start) = self.schedule.segment_start(active) else {
            return Vec::new();
        };

        self.session.interaction_locked = true;
        self.session.replaying_segment = true;
        self.state = PlayerState::ReplayingSegment;
        vec![
            Command::play_enabled(false),
            Command::all_options(OptionState::Locked),
            Command::status(StatusLine::ReplayingSegment { index: active }),
            Command::Timeline(TimelineCommand::Seek(start)),
            Command::Timeline(TimelineCommand::Play),
        ]
    }

    /// Evaluate a picked option against the required answer.
    ///
    /// Ignored while interaction is locked. A wrong pick marks the option
    /// and leaves the checkpoint open for further attempts; a correct pick
    /// closes it and arms the delayed auto-resume.
    pub fn submit_answer(&mut self, answer: &AnswerId) -> Vec<Command> {
        if self.session.interaction_locked {
            return Vec::new();
        }

        // With no active checkpoint the most recently passed one decides;
        // normally unreachable since interaction unlocks only at checkpoints.
        let required_index = match self.session.active_checkpoint {
            Some(index) => index,
            None => self.session.next_checkpoint.saturating_sub(1),
        };
        let Some(required) = self.schedule.expected_answer(required_index) else {
            return Vec::new();
        };

        if answer == required {
            self.session.active_checkpoint = None;
            self.session.interaction_locked = true;
            self.session.pending_resume = true;
            self.state = PlayerState::Playing;
            vec![
                Command::option_state(answer.clone(), OptionState::Correct),
                Command::status(StatusLine::Correct),
                Command::replay_enabled(false),
                Command::ScheduleResume,
            ]
        } else {
            vec![
                Command::option_state(answer.clone(), OptionState::Wrong),
                Command::status(StatusLine::Wrong),
            ]
        }
    }

    // ─── Timeline events ───────────────────────────────────────────────────

    /// The playhead moved. Detects checkpoint arrival (with tolerance, then
    /// an exact snap) and reports progress on every tick.
    pub fn position_advanced(&mut self, position: f64, duration: Option<f64>) -> Vec<Command> {
        let mut out = vec![Command::progress(progress_percent(
            position,
            duration,
            self.assumed_duration,
        ))];

        if !self.session.replaying_segment && self.session.next_checkpoint < self.schedule.len() {
            let next = self.session.next_checkpoint;
            if let Some(timestamp) = self.schedule.timestamp(next) {
                if position >= timestamp - self.epsilon {
                    self.session.active_checkpoint = Some(next);
                    self.session.next_checkpoint += 1;
                    out.extend(self.arrive_at(next, timestamp));
                    return out;
                }
            }
        }

        if self.session.replaying_segment {
            if let Some(active) = self.session.active_checkpoint {
                if let Some(target) = self.schedule.timestamp(active) {
                    if position >= target - self.epsilon {
                        self.session.replaying_segment = false;
                        out.extend(self.arrive_at(active, target));
                    }
                }
            }
        }
        out
    }

    /// Pause on the checkpoint and open the answer window.
    fn arrive_at(&mut self, index: usize, timestamp: f64) -> Vec<Command> {
        self.session.interaction_locked = false;
        self.state = PlayerState::AwaitingAnswer;
        vec![
            Command::Timeline(TimelineCommand::Pause),
            Command::Timeline(TimelineCommand::Seek(timestamp)),
            Command::play_enabled(false),
            Command::replay_enabled(true),
            Command::Display(DisplayCommand::ResetOptions),
            Command::status(StatusLine::Checkpoint {
                index,
                total: self.schedule.len(),
            }),
        ]
    }

    /// Narration actually started. Locks the choices, silences every option
    /// clip (one audio source at a time), and announces playback unless a
    /// segment replay is in flight.
    pub fn playback_started(&mut self) -> Vec<Command> {
        self.session.pending_resume = false;
        self.session.interaction_locked = true;
        let replaying = self.session.replaying_segment;
        self.state = if replaying {
            PlayerState::ReplayingSegment
        } else {
            PlayerState::Playing
        };

        let mut out = vec![
            Command::play_enabled(false),
            Command::all_options(OptionState::Locked),
            Command::StopAllClips,
        ];
        if !replaying {
            out.push(Command::status(StatusLine::Playing));
        }
        out
    }

    /// A pause that did not come from checkpoint arrival (external pause).
    /// The play affordance comes back only when no question is open.
    pub fn playback_paused(&mut self) -> Vec<Command> {
        if self.session.active_checkpoint.is_some() {
            return Vec::new();
        }
        vec![Command::play_enabled(true)]
    }

    /// The timeline reached its natural end.
    pub fn reached_end(&mut self) -> Vec<Command> {
        self.session.active_checkpoint = None;
        self.session.replaying_segment = false;
        self.session.pending_resume = false;
        self.session.interaction_locked = true;
        self.state = PlayerState::Finished;
        vec![
            Command::replay_enabled(false),
            Command::status(StatusLine::Finished),
            Command::all_options(OptionState::Locked),
            Command::Display(DisplayCommand::PlayLabel(PlayLabel::Replay)),
            Command::play_enabled(true),
        ]
    }

    /// The delayed-resume timer fired. Ignored unless a resume is actually
    /// pending, which also covers timers outliving a restart or teardown.
    pub fn resume_due(&mut self) -> Vec<Command> {
        if !self.session.pending_resume {
            return Vec::new();
        }
        self.session.pending_resume = false;
        vec![
            Command::play_enabled(true),
            Command::Timeline(TimelineCommand::Play),
        ]
    }
}

//
// ─── PROGRESS ──────────────────────────────────────────────────────────────────
//

/// Progress percentage for a playhead position, clamped to 100. Falls back
/// to `assumed_duration` while the real duration is unknown or unusable and
/// reports 0 when the computation is not finite.
#[must_use]
pub fn progress_percent(position: f64, duration: Option<f64>, assumed_duration: f64) -> f64 {
    let duration = duration
        .filter(|d| d.is_finite() && *d > 0.0)
        .unwrap_or(assumed_duration);
    let percent = (position / duration * 100.0).min(100.0);
    if percent.is_finite() { percent } else { 0.0 }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule() -> CheckpointSchedule {
        CheckpointSchedule::new(
            vec![18.0, 27.0],
            vec![AnswerId::new("X"), AnswerId::new("Y")],
        )
        .unwrap()
    }

    fn player() -> CheckpointPlayer {
        CheckpointPlayer::new(schedule())
    }

    /// Drive the player to `AwaitingAnswer` on the first checkpoint.
    fn player_at_first_checkpoint() -> CheckpointPlayer {
        let mut p = player();
        p.request_play();
        p.playback_started();
        p.position_advanced(18.0, Some(60.0));
        assert_eq!(p.state(), PlayerState::AwaitingAnswer);
        p
    }

    #[test]
    fn starts_idle_and_locked() {
        let p = player();
        assert_eq!(p.state(), PlayerState::Idle);
        assert!(p.session().interaction_locked);
    }

    #[test]
    fn first_play_request_just_plays() {
        let mut p = player();
        let commands = p.request_play();
        assert_eq!(commands, vec![Command::Timeline(TimelineCommand::Play)]);
        assert_eq!(p.state(), PlayerState::Playing);
    }

    #[test]
    fn overshoot_within_tolerance_snaps_to_the_checkpoint() {
        let mut p = player();
        p.request_play();
        p.playback_started();

        // 17.96 is inside the tolerance window; the tick must trigger.
        let commands = p.position_advanced(17.96, Some(60.0));

        assert!(commands.contains(&Command::Timeline(TimelineCommand::Pause)));
        assert!(commands.contains(&Command::Timeline(TimelineCommand::Seek(18.0))));
        assert!(commands.contains(&Command::replay_enabled(true)));
        assert!(commands.contains(&Command::status(StatusLine::Checkpoint {
            index: 0,
            total: 2
        })));
        assert_eq!(p.state(), PlayerState::AwaitingAnswer);
        assert_eq!(p.session().active_checkpoint, Some(0));
        assert_eq!(p.session().next_checkpoint, 1);
        assert!(!p.session().interaction_locked);
    }

    #[test]
    fn tick_short_of_tolerance_only_reports_progress() {
        let mut p = player();
        p.request_play();
        p.playback_started();

        let commands = p.position_advanced(17.9, Some(60.0));

        assert_eq!(commands.len(), 1);
        assert!(matches!(
            commands[0],
            Command::Display(DisplayCommand::Progress(_))
        ));
        assert_eq!(p.state(), PlayerState::Playing);
    }

    #[test]
    fn play_never_skips_an_open_checkpoint() {
        let mut p = player_at_first_checkpoint();
        let commands = p.request_play();

        assert!(commands.is_empty());
        assert_eq!(p.state(), PlayerState::AwaitingAnswer);
        assert_eq!(p.session().active_checkpoint, Some(0));
    }

    #[test]
    fn wrong_answer_keeps_the_checkpoint_open() {
        let mut p = player_at_first_checkpoint();
        let commands = p.submit_answer(&AnswerId::new("Z"));

        assert_eq!(
            commands,
            vec![
                Command::option_state(AnswerId::new("Z"), OptionState::Wrong),
                Command::status(StatusLine::Wrong),
            ]
        );
        assert_eq!(p.state(), PlayerState::AwaitingAnswer);
        assert_eq!(p.session().active_checkpoint, Some(0));
        assert!(!p.session().interaction_locked);
    }

    #[test]
    fn correct_answer_closes_the_checkpoint_and_arms_the_resume() {
        let mut p = player_at_first_checkpoint();
        let commands = p.submit_answer(&AnswerId::new("X"));

        assert!(commands.contains(&Command::option_state(
            AnswerId::new("X"),
            OptionState::Correct
        )));
        assert!(commands.contains(&Command::status(StatusLine::Correct)));
        assert!(commands.contains(&Command::replay_enabled(false)));
        assert!(commands.contains(&Command::ScheduleResume));
        assert_eq!(p.session().active_checkpoint, None);
        assert!(p.session().interaction_locked);
        assert!(p.session().pending_resume);
    }

    #[test]
    fn resume_fires_once_and_goes_stale_afterwards() {
        let mut p = player_at_first_checkpoint();
        p.submit_answer(&AnswerId::new("X"));

        let commands = p.resume_due();
        assert_eq!(
            commands,
            vec![
                Command::play_enabled(true),
                Command::Timeline(TimelineCommand::Play),
            ]
        );

        assert!(p.resume_due().is_empty());
    }

    #[test]
    fn answers_are_ignored_while_locked() {
        let mut p = player();
        p.request_play();
        p.playback_started();

        assert!(p.submit_answer(&AnswerId::new("X")).is_empty());
    }

    #[test]
    fn segment_replay_seeks_to_zero_for_the_first_checkpoint() {
        let mut p = player_at_first_checkpoint();
        let commands = p.request_replay_segment();

        assert!(commands.contains(&Command::Timeline(TimelineCommand::Seek(0.0))));
        assert!(commands.contains(&Command::status(StatusLine::ReplayingSegment { index: 0 })));
        assert_eq!(p.state(), PlayerState::ReplayingSegment);
        assert!(p.session().interaction_locked);
        assert!(p.session().replaying_segment);
    }

    #[test]
    fn segment_replay_seeks_to_the_previous_checkpoint_otherwise() {
        let mut p = player_at_first_checkpoint();
        p.submit_answer(&AnswerId::new("X"));
        p.resume_due();
        p.playback_started();
        p.position_advanced(27.0, Some(60.0));
        assert_eq!(p.session().active_checkpoint, Some(1));

        let commands = p.request_replay_segment();
        assert!(commands.contains(&Command::Timeline(TimelineCommand::Seek(18.0))));
    }

    #[test]
    fn segment_replay_returns_to_the_same_checkpoint() {
        let mut p = player_at_first_checkpoint();
        p.request_replay_segment();
        p.playback_started();

        // Passing the *first* checkpoint's timestamp again must re-open the
        // same question, not advance to the next one.
        let commands = p.position_advanced(18.0, Some(60.0));

        assert!(commands.contains(&Command::status(StatusLine::Checkpoint {
            index: 0,
            total: 2
        })));
        assert_eq!(p.state(), PlayerState::AwaitingAnswer);
        assert_eq!(p.session().active_checkpoint, Some(0));
        assert_eq!(p.session().next_checkpoint, 1);
        assert!(!p.session().replaying_segment);
    }

    #[test]
    fn replay_request_is_ignored_outside_the_answer_window() {
        let mut p = player();
        assert!(p.request_replay_segment().is_empty());

        p.request_play();
        p.playback_started();
        assert!(p.request_replay_segment().is_empty());
    }

    #[test]
    fn natural_end_finishes_the_quiz() {
        let mut p = player_at_first_checkpoint();
        p.submit_answer(&AnswerId::new("X"));
        p.resume_due();
        p.playback_started();
        p.position_advanced(27.0, Some(60.0));
        p.submit_answer(&AnswerId::new("Y"));
        p.resume_due();
        p.playback_started();

        let commands = p.reached_end();

        assert_eq!(p.state(), PlayerState::Finished);
        assert!(commands.contains(&Command::status(StatusLine::Finished)));
        assert!(commands.contains(&Command::all_options(OptionState::Locked)));
        assert!(commands.contains(&Command::Display(DisplayCommand::PlayLabel(
            PlayLabel::Replay
        ))));
        assert!(commands.contains(&Command::play_enabled(true)));
        assert!(commands.contains(&Command::replay_enabled(false)));
    }

    #[test]
    fn play_after_the_end_restarts_from_zero() {
        let mut p = player_at_first_checkpoint();
        p.submit_answer(&AnswerId::new("X"));
        p.resume_due();
        p.playback_started();
        p.position_advanced(27.0, Some(60.0));
        p.submit_answer(&AnswerId::new("Y"));
        p.reached_end();

        let commands = p.request_play();

        assert!(commands.contains(&Command::Timeline(TimelineCommand::Seek(0.0))));
        assert!(commands.contains(&Command::status(StatusLine::RestartedFromBeginning)));
        assert!(commands.contains(&Command::Timeline(TimelineCommand::Play)));
        assert_eq!(p.session().next_checkpoint, 0);
        assert_eq!(p.session().active_checkpoint, None);
    }

    #[test]
    fn stale_resume_after_restart_is_a_no_op() {
        let mut p = player_at_first_checkpoint();
        p.submit_answer(&AnswerId::new("X"));
        // The narration ends before the timer fires.
        p.reached_end();
        assert!(p.resume_due().is_empty());
    }

    #[test]
    fn external_pause_reenables_play_only_without_an_open_question() {
        let mut p = player();
        p.request_play();
        p.playback_started();
        assert_eq!(p.playback_paused(), vec![Command::play_enabled(true)]);

        let mut p = player_at_first_checkpoint();
        assert!(p.playback_paused().is_empty());
    }

    #[test]
    fn playback_start_locks_choices_and_silences_clips() {
        let mut p = player();
        p.request_play();
        let commands = p.playback_started();

        assert!(commands.contains(&Command::play_enabled(false)));
        assert!(commands.contains(&Command::all_options(OptionState::Locked)));
        assert!(commands.contains(&Command::StopAllClips));
        assert!(commands.contains(&Command::status(StatusLine::Playing)));
    }

    #[test]
    fn playback_start_during_replay_skips_the_playing_status() {
        let mut p = player_at_first_checkpoint();
        p.request_replay_segment();
        let commands = p.playback_started();

        assert!(!commands.contains(&Command::status(StatusLine::Playing)));
        assert_eq!(p.state(), PlayerState::ReplayingSegment);
    }

    #[test]
    fn fallback_answer_uses_the_most_recently_passed_checkpoint() {
        let mut p = player_at_first_checkpoint();
        p.submit_answer(&AnswerId::new("X"));
        // Forge the race this path guards against: interaction unlocked
        // with no active checkpoint.
        p.session.interaction_locked = false;

        let commands = p.submit_answer(&AnswerId::new("X"));
        assert!(commands.contains(&Command::option_state(
            AnswerId::new("X"),
            OptionState::Correct
        )));
    }

    #[test]
    fn progress_uses_the_assumed_duration_when_unknown() {
        assert_eq!(progress_percent(40.0, None, 80.0), 50.0);
        assert_eq!(progress_percent(40.0, Some(f64::NAN), 80.0), 50.0);
    }

    #[test]
    fn progress_is_clamped_to_one_hundred() {
        assert_eq!(progress_percent(90.0, Some(60.0), 80.0), 100.0);
    }

    #[test]
    fn progress_is_zero_when_not_finite() {
        assert_eq!(progress_percent(f64::NAN, Some(60.0), 80.0), 0.0);
    }

    #[test]
    fn progress_reported_on_every_tick() {
        let mut p = player();
        p.request_play();
        p.playback_started();

        let commands = p.position_advanced(5.0, Some(50.0));
        assert!(commands.contains(&Command::progress(10.0)));
    }
}
