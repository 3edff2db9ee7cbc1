#![forbid(unsafe_code)]

pub mod collaborators;
pub mod config;
pub mod engine;
pub mod error;

pub use quiz_core::Clock;

pub use collaborators::{MediaTimeline, OptionClip, QuizDisplay, ResumeScheduler};
pub use config::QuizConfig;
pub use engine::QuizEngine;
pub use error::{ConfigError, EngineError};
