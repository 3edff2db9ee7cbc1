use thiserror::Error;

use crate::model::ids::AnswerId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Errors raised while validating a checkpoint schedule.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CheckpointError {
    #[error("checkpoint schedule is empty")]
    Empty,

    #[error("{timestamps} timestamps but {answers} expected answers")]
    LengthMismatch { timestamps: usize, answers: usize },

    #[error("timestamp at index {index} must be finite and non-negative")]
    InvalidTimestamp { index: usize },

    #[error("timestamps must be strictly increasing (violated at index {index})")]
    NotIncreasing { index: usize },
}

//
// ─── CHECKPOINT ────────────────────────────────────────────────────────────────
//

/// A single pause point: a timestamp on the narration timeline and the answer
/// required to move past it.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkpoint {
    timestamp: f64,
    expected: AnswerId,
}

impl Checkpoint {
    /// Seconds into the timeline at which narration pauses.
    #[must_use]
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    /// The answer that resumes narration.
    #[must_use]
    pub fn expected_answer(&self) -> &AnswerId {
        &self.expected
    }
}

//
// ─── SCHEDULE ──────────────────────────────────────────────────────────────────
//

/// Ordered, validated set of checkpoints. Fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckpointSchedule {
    checkpoints: Vec<Checkpoint>,
}

impl CheckpointSchedule {
    /// Builds a schedule from parallel timestamp/answer lists.
    ///
    /// # Errors
    ///
    /// - `CheckpointError::Empty` if no checkpoints are given
    /// - `CheckpointError::LengthMismatch` if the lists differ in length
    /// - `CheckpointError::InvalidTimestamp` for NaN/infinite/negative entries
    /// - `CheckpointError::NotIncreasing` unless timestamps strictly increase
    pub fn new(timestamps: Vec<f64>, answers: Vec<AnswerId>) -> Result<Self, CheckpointError> {
        if timestamps.len() != answers.len() {
            return Err(CheckpointError::LengthMismatch {
                timestamps: timestamps.len(),
                answers: answers.len(),
            });
        }
        if timestamps.is_empty() {
            return Err(CheckpointError::Empty);
        }

        for (index, timestamp) in timestamps.iter().enumerate() {
            if !timestamp.is_finite() || *timestamp < 0.0 {
                return Err(CheckpointError::InvalidTimestamp { index });
            }
            if index > 0 && *timestamp <= timestamps[index - 1] {
                return Err(CheckpointError::NotIncreasing { index });
            }
        }

        let checkpoints = timestamps
            .into_iter()
            .zip(answers)
            .map(|(timestamp, expected)| Checkpoint {
                timestamp,
                expected,
            })
            .collect();

        Ok(Self { checkpoints })
    }

    /// Number of checkpoints, fixed for the lifetime of the schedule.
    #[must_use]
    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Checkpoint> {
        self.checkpoints.get(index)
    }

    #[must_use]
    pub fn timestamp(&self, index: usize) -> Option<f64> {
        self.checkpoints.get(index).map(Checkpoint::timestamp)
    }

    #[must_use]
    pub fn expected_answer(&self, index: usize) -> Option<&AnswerId> {
        self.checkpoints.get(index).map(Checkpoint::expected_answer)
    }

    /// Start of the segment leading into checkpoint `index`: the previous
    /// checkpoint's timestamp, or 0 for the first.
    #[must_use]
    pub fn segment_start(&self, index: usize) -> Option<f64> {
        if index >= self.checkpoints.len() {
            return None;
        }
        if index == 0 {
            Some(0.0)
        } else {
            Some(self.checkpoints[index - 1].timestamp)
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
