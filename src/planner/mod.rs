//! Study plan generation.
//!
//! The generator is a pure function of [`PlanSettings`] and the current date;
//! persisting the result is left to the caller.

mod generator;

pub use generator::generate;

use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Study,
    Review,
    MockExam,
}

impl BlockKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Study => "study",
            BlockKind::Review => "review",
            BlockKind::MockExam => "mock_exam",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown block kind '{0}'")]
pub struct UnknownBlockKind(pub String);

impl FromStr for BlockKind {
    type Err = UnknownBlockKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "study" => Ok(BlockKind::Study),
            "review" => Ok(BlockKind::Review),
            "mock_exam" => Ok(BlockKind::MockExam),
            other => Err(UnknownBlockKind(other.to_string())),
        }
    }
}

impl TryFrom<String> for BlockKind {
    type Error = UnknownBlockKind;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Pacing template; decides how often mock exams are scheduled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    Intensive,
    #[default]
    Balanced,
    Light,
}

impl Template {
    pub fn mock_period_weeks(self) -> i64 {
        match self {
            Template::Intensive => 1,
            Template::Balanced => 2,
            Template::Light => 3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisciplineMastery {
    pub id: String,
    /// Self-rated familiarity, 1 (novice) to 5 (expert).
    pub mastery: i64,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSettings {
    pub weekly_hours: f64,
    pub disciplines: Vec<DisciplineMastery>,
    #[serde(default)]
    pub exam_date: Option<NaiveDate>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub template: Option<Template>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedBlock {
    pub id: String,
    pub discipline_id: String,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub kind: BlockKind,
    pub pomodoros: u32,
    /// Zero-based week of the plan the block belongs to.
    pub week: u32,
}

impl PlannedBlock {
    pub fn hours(&self) -> f64 {
        (self.end_time - self.start_time).num_minutes() as f64 / 60.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub total: usize,
    pub study: usize,
    pub review: usize,
    pub mock_exam: usize,
    pub weeks: i64,
    pub sessions_per_week: usize,
    pub planned_hours: f64,
    pub exam_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedPlan {
    pub blocks: Vec<PlannedBlock>,
    pub summary: PlanSummary,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
    #[error("weeklyHours must be greater than zero")]
    InvalidWeeklyHours,
    #[error("at least one discipline is required")]
    NoDisciplines,
    #[error("dates must stay within the supported calendar range")]
    DateOutOfRange,
}
