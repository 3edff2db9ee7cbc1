//! The quiz engine: wires the pre-listen gate and the checkpoint player to
//! their collaborators and enforces the gate-before-player interlock.
//!
//! The engine is the only writer of every collaborator. It feeds typed
//! events into the two state machines and applies the commands they
//! return; it holds no quiz logic of its own beyond the interlock and the
//! teardown guard for the delayed-resume timer.

use chrono::{DateTime, Utc};
use std::time::Duration;

use quiz_core::command::{ClipCommand, Command, DisplayCommand, PlayLabel, TimelineCommand};
use quiz_core::model::{AnswerId, OptionState, SessionId, SoundOption};
use quiz_core::{CheckpointPlayer, Clock, PlayerState, PreListenGate};

use crate::collaborators::{MediaTimeline, OptionClip, QuizDisplay, ResumeScheduler};
use crate::config::QuizConfig;
use crate::error::EngineError;

pub struct QuizEngine {
    session_id: SessionId,
    started_at: DateTime<Utc>,
    gate: PreListenGate,
    player: CheckpointPlayer,
    options: Vec<SoundOption>,
    clips: Vec<(AnswerId, Box<dyn OptionClip>)>,
    timeline: Box<dyn MediaTimeline>,
    display: Box<dyn QuizDisplay>,
    scheduler: Box<dyn ResumeScheduler>,
    resume_delay: Duration,
    torn_down: bool,
}

impl std::fmt::Debug for QuizEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizEngine")
            .field("session_id", &self.session_id)
            .field("started_at", &self.started_at)
            .field("resume_delay", &self.resume_delay)
            .field("torn_down", &self.torn_down)
            .finish_non_exhaustive()
    }
}

impl QuizEngine {
    /// Assemble an engine for one quiz session.
    ///
    /// `clips` must provide exactly one clip per configured option.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Config` for an invalid configuration and
    /// `MissingClip`/`DuplicateClip`/`UnknownClip` when the clip set does
    /// not match the option set.
    pub fn new(
        config: &QuizConfig,
        timeline: Box<dyn MediaTimeline>,
        clips: Vec<(AnswerId, Box<dyn OptionClip>)>,
        display: Box<dyn QuizDisplay>,
        scheduler: Box<dyn ResumeScheduler>,
        clock: Clock,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let schedule = config.schedule()?;
        let option_ids = config.option_ids();

        for (answer, _) in &clips {
            if !option_ids.contains(answer) {
                return Err(EngineError::UnknownClip {
                    answer: answer.clone(),
                });
            }
        }
        for answer in &option_ids {
            match clips.iter().filter(|(id, _)| id == answer).count() {
                0 => {
                    return Err(EngineError::MissingClip {
                        answer: answer.clone(),
                    });
                }
                1 => {}
                _ => {
                    return Err(EngineError::DuplicateClip {
                        answer: answer.clone(),
                    });
                }
            }
        }

        let player = CheckpointPlayer::new(schedule)
            .with_epsilon(config.epsilon_secs)
            .with_assumed_duration(config.assumed_duration_secs);
        let gate = PreListenGate::new(option_ids.clone());
        let options = option_ids.into_iter().map(SoundOption::new).collect();

        let mut engine = Self {
            session_id: SessionId::new(),
            started_at: clock.now(),
            gate,
            player,
            options,
            clips,
            timeline,
            display,
            scheduler,
            resume_delay: config.resume_delay(),
            torn_down: false,
        };
        engine.present_initial_state();
        Ok(engine)
    }

    /// Everything starts disabled: the gate owns the first phase.
    fn present_initial_state(&mut self) {
        self.display.play_enabled(false);
        self.display.replay_enabled(false);
        self.display.play_label(PlayLabel::Play);
        for option in &self.options {
            self.display.option_state(option.answer(), option.state());
        }
    }

    // ─── User actions ──────────────────────────────────────────────────────

    /// Audition one sample during the pre-listen phase. Ignored once the
    /// gate is satisfied: from then on the narration owns the audio.
    pub fn audition_option(&mut self, answer: &AnswerId) {
        if self.gate.is_complete() {
            return;
        }
        let commands = self.gate.audition(answer);
        self.apply(commands);
    }

    /// Submit an answer for the active checkpoint.
    pub fn submit_answer(&mut self, answer: &AnswerId) {
        if !self.gate.is_complete() {
            return;
        }
        let commands = self.player.submit_answer(answer);
        self.apply(commands);
    }

    /// Start or resume narration. Inert until the gate is satisfied.
    pub fn request_play(&mut self) {
        if !self.gate.is_complete() {
            return;
        }
        let commands = self.player.request_play();
        self.apply(commands);
    }

    /// Re-listen to the segment before the active checkpoint. Inert until
    /// the gate is satisfied.
    pub fn request_replay_segment(&mut self) {
        if !self.gate.is_complete() {
            return;
        }
        let commands = self.player.request_replay_segment();
        self.apply(commands);
    }

    // ─── Collaborator events ───────────────────────────────────────────────

    /// An option clip played to its natural end.
    pub fn option_clip_finished(&mut self, answer: &AnswerId) {
        if self.gate.is_complete() {
            return;
        }
        let commands = self.gate.clip_finished(answer);
        if self.gate.is_complete() {
            tracing::info!(session = %self.session_id, "pre-listen gate satisfied");
        }
        self.apply(commands);
    }

    /// The narration playhead moved; position and duration are read back
    /// from the timeline collaborator.
    pub fn position_advanced(&mut self) {
        if !self.gate.is_complete() {
            return;
        }
        let position = self.timeline.position();
        let duration = self.timeline.duration();
        let was = self.player.state();
        let commands = self.player.position_advanced(position, duration);
        if was != PlayerState::AwaitingAnswer && self.player.state() == PlayerState::AwaitingAnswer
        {
            tracing::debug!(
                session = %self.session_id,
                checkpoint = ?self.player.session().active_checkpoint,
                "checkpoint reached"
            );
        }
        self.apply(commands);
    }

    /// Narration playback actually started.
    pub fn playback_started(&mut self) {
        if !self.gate.is_complete() {
            return;
        }
        let commands = self.player.playback_started();
        self.apply(commands);
    }

    /// Narration paused for a reason other than checkpoint arrival.
    pub fn playback_paused(&mut self) {
        if !self.gate.is_complete() {
            return;
        }
        let commands = self.player.playback_paused();
        self.apply(commands);
    }

    /// Narration reached its natural end.
    pub fn reached_end(&mut self) {
        if !self.gate.is_complete() {
            return;
        }
        tracing::info!(session = %self.session_id, "narration finished");
        let commands = self.player.reached_end();
        self.apply(commands);
    }

    /// The delayed-resume timer fired. Stale firings (after teardown or a
    /// restart) fall through to the player's own pending-resume guard.
    pub fn resume_due(&mut self) {
        if self.torn_down {
            return;
        }
        let commands = self.player.resume_due();
        self.apply(commands);
    }

    /// Cancel the pending resume, if any, and stop acting on timers. The
    /// engine takes no further scheduled actions after this.
    pub fn teardown(&mut self) {
        self.torn_down = true;
        self.scheduler.cancel();
    }

    // ─── Queries ───────────────────────────────────────────────────────────

    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn gate_complete(&self) -> bool {
        self.gate.is_complete()
    }

    #[must_use]
    pub fn player_state(&self) -> PlayerState {
        self.player.state()
    }

    #[must_use]
    pub fn options(&self) -> &[SoundOption] {
        &self.options
    }

    #[must_use]
    pub fn option_state(&self, answer: &AnswerId) -> Option<OptionState> {
        self.options
            .iter()
            .find(|option| option.answer() == answer)
            .map(SoundOption::state)
    }

    // ─── Command application ───────────────────────────────────────────────

    fn apply(&mut self, commands: Vec<Command>) {
        for command in commands {
            match command {
                Command::Timeline(TimelineCommand::Play) => self.timeline.play(),
                Command::Timeline(TimelineCommand::Pause) => self.timeline.pause(),
                Command::Timeline(TimelineCommand::Seek(position)) => {
                    self.timeline.seek(position);
                }
                Command::Clip(answer, ClipCommand::Play) => {
                    if let Some(clip) = self.clip_mut(&answer) {
                        clip.play();
                    }
                }
                Command::Clip(answer, ClipCommand::Rewind) => {
                    if let Some(clip) = self.clip_mut(&answer) {
                        clip.rewind();
                    }
                }
                Command::StopOtherClips(answer) => {
                    for (id, clip) in &mut self.clips {
                        if *id != answer {
                            clip.rewind();
                        }
                    }
                }
                Command::StopAllClips => {
                    for (_, clip) in &mut self.clips {
                        clip.rewind();
                    }
                }
                Command::ScheduleResume => {
                    if !self.torn_down {
                        self.scheduler.schedule(self.resume_delay);
                    }
                }
                Command::Display(display) => self.apply_display(display),
            }
        }
    }

    fn apply_display(&mut self, command: DisplayCommand) {
        match command {
            DisplayCommand::Status(line) => {
                tracing::debug!(session = %self.session_id, status = %line, "status");
                self.display.status(&line);
            }
            DisplayCommand::OptionState(answer, state) => {
                self.set_option_state(&answer, state);
            }
            DisplayCommand::AllOptions(state) => {
                for index in 0..self.options.len() {
                    self.options[index].set_state(state);
                    self.display.option_state(self.options[index].answer(), state);
                }
            }
            DisplayCommand::ResetOptions => {
                for index in 0..self.options.len() {
                    self.options[index].set_state(OptionState::Neutral);
                    self.display
                        .option_state(self.options[index].answer(), OptionState::Neutral);
                }
            }
            DisplayCommand::PlayEnabled(enabled) => self.display.play_enabled(enabled),
            DisplayCommand::ReplayEnabled(enabled) => self.display.replay_enabled(enabled),
            DisplayCommand::PlayLabel(label) => self.display.play_label(label),
            DisplayCommand::Progress(percent) => self.display.progress(percent),
        }
    }

    fn set_option_state(&mut self, answer: &AnswerId, state: OptionState) {
        if let Some(option) = self
            .options
            .iter_mut()
            .find(|option| option.answer() == answer)
        {
            option.set_state(state);
        }
        self.display.option_state(answer, state);
    }

    fn clip_mut(&mut self, answer: &AnswerId) -> Option<&mut Box<dyn OptionClip>> {
        self.clips
            .iter_mut()
            .find(|(id, _)| id == answer)
            .map(|(_, clip)| clip)
    }
}
