//! Quiz configuration: the checkpoint table, the option set, and tuning.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use quiz_core::model::{AnswerId, CheckpointSchedule};
use quiz_core::player::{
    DEFAULT_ASSUMED_DURATION_SECS, DEFAULT_EPSILON_SECS, DEFAULT_RESUME_DELAY_MS,
};

use crate::error::ConfigError;

fn default_epsilon() -> f64 {
    DEFAULT_EPSILON_SECS
}

fn default_resume_delay() -> u64 {
    DEFAULT_RESUME_DELAY_MS
}

fn default_assumed_duration() -> f64 {
    DEFAULT_ASSUMED_DURATION_SECS
}

/// Everything needed to assemble one quiz.
///
/// `checkpoints` and `answers` are index-aligned; `options` is the full
/// audition set shown to the player and must cover every expected answer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuizConfig {
    pub checkpoints: Vec<f64>,
    pub answers: Vec<String>,
    pub options: Vec<String>,
    #[serde(default = "default_epsilon")]
    pub epsilon_secs: f64,
    #[serde(default = "default_resume_delay")]
    pub resume_delay_ms: u64,
    #[serde(default = "default_assumed_duration")]
    pub assumed_duration_secs: f64,
}

impl Default for QuizConfig {
    /// The reference scenario: six checkpoints, six snack sounds.
    fn default() -> Self {
        Self {
            checkpoints: vec![18.0, 27.0, 35.0, 42.0, 52.0, 58.0],
            answers: vec![
                "Ice-Cream".into(),
                "Carrots".into(),
                "Chips".into(),
                "Cookies".into(),
                "Sprite".into(),
                "Chocolate-Bar".into(),
            ],
            options: vec![
                "Ice-Cream".into(),
                "Carrots".into(),
                "Chips".into(),
                "Cookies".into(),
                "Sprite".into(),
                "Chocolate-Bar".into(),
            ],
            epsilon_secs: DEFAULT_EPSILON_SECS,
            resume_delay_ms: DEFAULT_RESUME_DELAY_MS,
            assumed_duration_secs: DEFAULT_ASSUMED_DURATION_SECS,
        }
    }
}

impl QuizConfig {
    /// Parse a configuration from JSON and validate it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Json` on malformed JSON and any validation
    /// error from [`validate`](Self::validate).
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file from disk.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read, plus anything
    /// [`from_json`](Self::from_json) rejects.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Check internal consistency of the option and answer sets.
    ///
    /// # Errors
    ///
    /// - `ConfigError::NoOptions` if the option set is empty
    /// - `ConfigError::BlankLabel` for whitespace-only labels
    /// - `ConfigError::DuplicateOption` for repeated labels
    /// - `ConfigError::UnknownAnswer` if an expected answer has no option
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.options.is_empty() {
            return Err(ConfigError::NoOptions);
        }
        for (index, label) in self.options.iter().enumerate() {
            if label.trim().is_empty() {
                return Err(ConfigError::BlankLabel { index });
            }
            if self.options[..index].contains(label) {
                return Err(ConfigError::DuplicateOption {
                    label: label.clone(),
                });
            }
        }
        for answer in &self.answers {
            if !self.options.contains(answer) {
                return Err(ConfigError::UnknownAnswer {
                    label: answer.clone(),
                });
            }
        }
        Ok(())
    }

    /// Build the validated checkpoint schedule.
    ///
    /// # Errors
    ///
    /// Propagates `CheckpointError` for empty, misaligned, or
    /// non-increasing checkpoint tables.
    pub fn schedule(&self) -> Result<CheckpointSchedule, ConfigError> {
        let answers = self
            .answers
            .iter()
            .map(|label| AnswerId::new(label.as_str()))
            .collect();
        Ok(CheckpointSchedule::new(self.checkpoints.clone(), answers)?)
    }

    /// The audition/answer option set as ids, in display order.
    #[must_use]
    pub fn option_ids(&self) -> Vec<AnswerId> {
        self.options
            .iter()
            .map(|label| AnswerId::new(label.as_str()))
            .collect()
    }

    /// Delay between a correct answer and the automatic resume.
    #[must_use]
    pub fn resume_delay(&self) -> Duration {
        Duration::from_millis(self.resume_delay_ms)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_scenario_is_valid() {
        let config = QuizConfig::default();
        config.validate().unwrap();

        let schedule = config.schedule().unwrap();
        assert_eq!(schedule.len(), 6);
        assert_eq!(schedule.timestamp(0), Some(18.0));
        assert_eq!(schedule.expected_answer(5).unwrap().as_str(), "Chocolate-Bar");
    }

    #[test]
    fn json_with_defaults_fills_in_tuning() {
        let config = QuizConfig::from_json(
            r#"{
                "checkpoints": [10.0, 20.0],
                "answers": ["A", "B"],
                "options": ["A", "B", "C"]
            }"#,
        )
        .unwrap();

        assert_eq!(config.epsilon_secs, DEFAULT_EPSILON_SECS);
        assert_eq!(config.resume_delay_ms, DEFAULT_RESUME_DELAY_MS);
        assert_eq!(config.assumed_duration_secs, DEFAULT_ASSUMED_DURATION_SECS);
        assert_eq!(config.resume_delay(), Duration::from_millis(400));
    }

    #[test]
    fn answer_without_matching_option_is_rejected() {
        let err = QuizConfig::from_json(
            r#"{
                "checkpoints": [10.0],
                "answers": ["Missing"],
                "options": ["A"]
            }"#,
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::UnknownAnswer { label } if label == "Missing"));
    }

    #[test]
    fn duplicate_and_blank_options_are_rejected() {
        let mut config = QuizConfig::default();
        config.options.push("Chips".into());
        assert!(matches!(
            config.validate().unwrap_err(),
            ConfigError::DuplicateOption { .. }
        ));

        let mut config = QuizConfig::default();
        config.options[2] = "   ".into();
        assert!(matches!(
            config.validate().unwrap_err(),
            ConfigError::BlankLabel { index: 2 }
        ));
    }

    #[test]
    fn empty_option_set_is_rejected() {
        let config = QuizConfig {
            options: Vec::new(),
            answers: Vec::new(),
            checkpoints: vec![1.0],
            ..QuizConfig::default()
        };
        assert!(matches!(config.validate().unwrap_err(), ConfigError::NoOptions));
    }

    #[test]
    fn misaligned_checkpoint_table_is_rejected() {
        let config = QuizConfig {
            checkpoints: vec![10.0, 20.0],
            answers: vec!["A".into()],
            options: vec!["A".into()],
            ..QuizConfig::default()
        };
        assert!(matches!(
            config.schedule().unwrap_err(),
            ConfigError::Checkpoint(_)
        ));
    }
}
