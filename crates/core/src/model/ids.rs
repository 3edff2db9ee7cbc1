use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifier for a sound option: the answer label it stands for.
///
/// Two options never share a label, so the label doubles as the option's
/// identity throughout the quiz.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnswerId(String);

impl AnswerId {
    /// Creates a new `AnswerId` from a label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Returns the underlying label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier for one quiz session, minted per engine instance.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Mints a fresh random `SessionId`.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying uuid.
    #[must_use]
    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AnswerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnswerId({})", self.0)
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for AnswerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── FromStr Implementations ───────────────────────────────────────────────────

/// Error type for parsing an `AnswerId` from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAnswerIdError;

impl fmt::Display for ParseAnswerIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "answer label must not be empty")
    }
}

impl std::error::Error for ParseAnswerIdError {}

impl FromStr for AnswerId {
    type Err = ParseAnswerIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(ParseAnswerIdError);
        }
        Ok(AnswerId::new(s))
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_id_display() {
        let id = AnswerId::new("Chips");
        assert_eq!(id.to_string(), "Chips");
        assert_eq!(id.as_str(), "Chips");
    }

    #[test]
    fn answer_id_from_str() {
        let id: AnswerId = "Ice-Cream".parse().unwrap();
        assert_eq!(id, AnswerId::new("Ice-Cream"));
    }

    #[test]
    fn answer_id_from_str_rejects_blank() {
        assert!("   ".parse::<AnswerId>().is_err());
        assert!("".parse::<AnswerId>().is_err());
    }

    #[test]
    fn session_ids_are_unique() {
        assert_ne!(SessionId::new(), SessionId::new());
    }
}
