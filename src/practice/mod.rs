//! Practice sessions: drawing questions from the pool, grading answers and
//! summarizing results.

mod engine;

pub use engine::{draw, elapsed_ms, grade, normalize_letter, summarize, Graded};

use std::str::FromStr;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Idle,
    Loading,
    InProgress,
    Finished,
}

impl SessionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Loading => "loading",
            SessionStatus::InProgress => "in_progress",
            SessionStatus::Finished => "finished",
        }
    }

    /// Moves to `next` if the lifecycle allows it.
    pub fn advance(self, next: SessionStatus) -> Result<SessionStatus, PracticeError> {
        use SessionStatus::*;
        match (self, next) {
            (Idle, Loading) | (Loading, InProgress) | (Loading, Idle) | (InProgress, Finished) => {
                Ok(next)
            }
            (from, to) => Err(PracticeError::InvalidTransition { from, to }),
        }
    }
}

impl FromStr for SessionStatus {
    type Err = PracticeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(SessionStatus::Idle),
            "loading" => Ok(SessionStatus::Loading),
            "in_progress" => Ok(SessionStatus::InProgress),
            "finished" => Ok(SessionStatus::Finished),
            other => Err(PracticeError::UnknownStatus(other.to_string())),
        }
    }
}

impl TryFrom<String> for SessionStatus {
    type Error = PracticeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PracticeError {
    #[error("cannot move a practice session from {from} to {to}")]
    InvalidTransition {
        from: SessionStatus,
        to: SessionStatus,
    },
    #[error("unknown session status '{0}'")]
    UnknownStatus(String),
    #[error("question {0} has no correct alternative")]
    MissingAnswerKey(String),
    #[error("'{0}' is not one of the question's alternatives")]
    UnknownLetter(String),
}

/// A question id in the pool together with the discipline it counts for.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PoolEntry {
    pub id: String,
    pub discipline: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisciplineScore {
    pub discipline: String,
    pub responded: usize,
    pub correct: usize,
    pub accuracy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeSummary {
    pub total_questions: usize,
    pub responded: usize,
    pub correct: usize,
    /// Percentage of responded questions answered correctly.
    pub accuracy: f64,
    pub per_discipline: Vec<DisciplineScore>,
}
