//! Console demo: runs one full quiz session against a simulated timeline.
//!
//! The simulation stands in for a real media stack: it owns a playhead that
//! advances in fixed ticks, turns engine commands into the corresponding
//! events (started/paused/ended), and prints every display update.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use quiz_core::Clock;
use quiz_core::command::PlayLabel;
use quiz_core::model::{AnswerId, OptionState};
use quiz_core::status::StatusLine;
use services::collaborators::{MediaTimeline, OptionClip, QuizDisplay, ResumeScheduler};
use services::{QuizConfig, QuizEngine};

const TICK_SECS: f64 = 0.25;
const SIM_DURATION_SECS: f64 = 62.0;

// ─── Arguments ─────────────────────────────────────────────────────────────────

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
        }
    }
}

impl std::error::Error for ArgsError {}

struct Args {
    config: Option<PathBuf>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Option<Self>, ArgsError> {
        let mut config = None;
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    let value = args
                        .next()
                        .ok_or(ArgsError::MissingValue { flag: "--config" })?;
                    config = Some(PathBuf::from(value));
                }
                "--help" | "-h" => {
                    print_usage();
                    return Ok(None);
                }
                other => return Err(ArgsError::UnknownArg(other.to_string())),
            }
        }
        Ok(Some(Self { config }))
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--config <quiz.json>]");
    eprintln!();
    eprintln!("Runs a scripted playthrough of the checkpoint audio quiz.");
    eprintln!("Without --config the built-in reference scenario is used.");
}

// ─── Simulated collaborators ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MediaEvent {
    Started,
    Paused,
    Ended,
}

#[derive(Debug)]
struct MediaState {
    position: f64,
    duration: f64,
    playing: bool,
    events: VecDeque<MediaEvent>,
}

impl MediaState {
    fn new(duration: f64) -> Self {
        Self {
            position: 0.0,
            duration,
            playing: false,
            events: VecDeque::new(),
        }
    }

    /// Advance one tick; returns false once the end has been reached.
    fn tick(&mut self) -> bool {
        if !self.playing {
            return true;
        }
        self.position += TICK_SECS;
        if self.position >= self.duration {
            self.position = self.duration;
            self.playing = false;
            self.events.push_back(MediaEvent::Ended);
            return false;
        }
        true
    }
}

struct SimTimeline(Rc<RefCell<MediaState>>);

impl MediaTimeline for SimTimeline {
    fn play(&mut self) {
        let mut media = self.0.borrow_mut();
        if !media.playing {
            media.playing = true;
            media.events.push_back(MediaEvent::Started);
        }
    }

    fn pause(&mut self) {
        let mut media = self.0.borrow_mut();
        if media.playing {
            media.playing = false;
            media.events.push_back(MediaEvent::Paused);
        }
    }

    fn seek(&mut self, position: f64) {
        self.0.borrow_mut().position = position;
    }

    fn position(&self) -> f64 {
        self.0.borrow().position
    }

    fn duration(&self) -> Option<f64> {
        Some(self.0.borrow().duration)
    }
}

struct SimClip;

impl OptionClip for SimClip {
    fn play(&mut self) {}

    fn rewind(&mut self) {}
}

struct SimScheduler(Rc<RefCell<Option<Duration>>>);

impl ResumeScheduler for SimScheduler {
    fn schedule(&mut self, delay: Duration) {
        *self.0.borrow_mut() = Some(delay);
    }

    fn cancel(&mut self) {
        *self.0.borrow_mut() = None;
    }
}

/// Prints every display update the engine emits.
struct ConsoleDisplay;

impl QuizDisplay for ConsoleDisplay {
    fn status(&mut self, line: &StatusLine) {
        println!("  status | {line}");
    }

    fn option_state(&mut self, answer: &AnswerId, state: OptionState) {
        println!("  option | {answer} -> {state}");
    }

    fn progress(&mut self, _percent: f64) {
        // Too chatty for a console run; progress is visible in the ticks.
    }

    fn play_enabled(&mut self, enabled: bool) {
        println!("  play   | {}", if enabled { "enabled" } else { "disabled" });
    }

    fn replay_enabled(&mut self, enabled: bool) {
        println!("  replay | {}", if enabled { "enabled" } else { "disabled" });
    }

    fn play_label(&mut self, label: PlayLabel) {
        println!("  play   | label: {}", label.as_str());
    }
}

// ─── Demo driver ───────────────────────────────────────────────────────────────

struct Demo {
    engine: QuizEngine,
    media: Rc<RefCell<MediaState>>,
    pending_resume: Rc<RefCell<Option<Duration>>>,
    config: QuizConfig,
}

impl Demo {
    fn new(config: QuizConfig) -> Result<Self, services::EngineError> {
        let media = Rc::new(RefCell::new(MediaState::new(SIM_DURATION_SECS)));
        let pending_resume = Rc::new(RefCell::new(None));

        let clips: Vec<(AnswerId, Box<dyn OptionClip>)> = config
            .option_ids()
            .into_iter()
            .map(|answer| (answer, Box::new(SimClip) as Box<dyn OptionClip>))
            .collect();

        let engine = QuizEngine::new(
            &config,
            Box::new(SimTimeline(Rc::clone(&media))),
            clips,
            Box::new(ConsoleDisplay),
            Box::new(SimScheduler(Rc::clone(&pending_resume))),
            Clock::default(),
        )?;

        Ok(Self {
            engine,
            media,
            pending_resume,
            config,
        })
    }

    /// Deliver queued media events to the engine, like a media element
    /// firing its callbacks.
    fn pump_events(&mut self) {
        loop {
            let event = self.media.borrow_mut().events.pop_front();
            match event {
                Some(MediaEvent::Started) => self.engine.playback_started(),
                Some(MediaEvent::Paused) => self.engine.playback_paused(),
                Some(MediaEvent::Ended) => self.engine.reached_end(),
                None => break,
            }
        }
    }

    async fn audition_all(&mut self) {
        println!("== pre-listen phase ==");
        for answer in self.config.option_ids() {
            println!("> audition {answer}");
            self.engine.audition_option(&answer);
            tokio::time::sleep(Duration::from_millis(40)).await;
            // The sample runs to its natural end.
            self.engine.option_clip_finished(&answer);
        }
    }

    /// Let the playhead run until the engine pauses the timeline or the
    /// narration ends.
    async fn run_until_pause_or_end(&mut self) {
        loop {
            let alive = self.media.borrow_mut().tick();
            if alive {
                self.engine.position_advanced();
            }
            self.pump_events();
            if !self.media.borrow().playing {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    async fn fire_pending_resume(&mut self) {
        if let Some(delay) = self.pending_resume.borrow_mut().take() {
            tokio::time::sleep(delay).await;
            self.engine.resume_due();
        }
        self.pump_events();
    }

    async fn play_through_story(&mut self) {
        println!("== story phase ==");
        println!("> play");
        self.engine.request_play();
        self.pump_events();

        let answers: Vec<AnswerId> = self
            .config
            .answers
            .iter()
            .map(|label| AnswerId::new(label.as_str()))
            .collect();

        for (index, expected) in answers.iter().enumerate() {
            self.run_until_pause_or_end().await;

            // Second checkpoint: show off the segment re-listen.
            if index == 1 {
                println!("> re-listen to the segment");
                self.engine.request_replay_segment();
                self.pump_events();
                self.run_until_pause_or_end().await;
            }

            // One wrong pick first, then the right one.
            if let Some(wrong) = self
                .config
                .option_ids()
                .into_iter()
                .find(|option| option != expected)
            {
                println!("> pick {wrong} (wrong on purpose)");
                self.engine.submit_answer(&wrong);
            }
            println!("> pick {expected}");
            self.engine.submit_answer(expected);
            self.fire_pending_resume().await;
        }

        // Ride out the tail of the narration.
        self.run_until_pause_or_end().await;
        println!("== done: {:?} ==", self.engine.player_state());
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut raw_args = std::env::args().skip(1);
    let Some(args) = Args::parse(&mut raw_args).inspect_err(|_| print_usage())? else {
        return Ok(());
    };

    let config = match &args.config {
        Some(path) => QuizConfig::load(path)?,
        None => QuizConfig::default(),
    };

    tracing::info!(
        checkpoints = config.checkpoints.len(),
        options = config.options.len(),
        "starting quiz demo"
    );

    let mut demo = Demo::new(config)?;
    demo.audition_all().await;
    demo.play_through_story().await;
    demo.engine.teardown();
    Ok(())
}
