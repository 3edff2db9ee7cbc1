//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{AnswerId, CheckpointError};

/// Errors emitted while loading or validating a quiz configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to read quiz configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid quiz configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
    #[error("no sound options configured")]
    NoOptions,
    #[error("blank option label at index {index}")]
    BlankLabel { index: usize },
    #[error("duplicate option label: {label}")]
    DuplicateOption { label: String },
    #[error("expected answer {label} has no matching option")]
    UnknownAnswer { label: String },
}

/// Errors emitted while assembling a `QuizEngine`.
///
/// The running engine has no error surface of its own: invariant-violating
/// calls are UI races and handled as silent no-ops.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("no clip provided for option {answer}")]
    MissingClip { answer: AnswerId },
    #[error("duplicate clip for option {answer}")]
    DuplicateClip { answer: AnswerId },
    #[error("clip provided for unknown option {answer}")]
    UnknownClip { answer: AnswerId },
}
