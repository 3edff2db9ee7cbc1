use thiserror::Error;

use crate::model::{CheckpointError, ParseAnswerIdError};

/// Top-level error for the quiz domain crate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
    #[error(transparent)]
    ParseAnswerId(#[from] ParseAnswerIdError),
}
