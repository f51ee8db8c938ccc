// Database model structs

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use crate::planner::BlockKind;
use crate::practice::SessionStatus;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StudyBlock {
    pub id: String,
    pub user_id: String,
    pub discipline_id: String,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[sqlx(try_from = "String")]
    pub kind: BlockKind,
    pub pomodoros: u32,
    pub completed: bool,
}

/// Fields of a block created by hand rather than by the generator.
#[derive(Debug, Clone)]
pub struct NewBlock {
    pub discipline_id: String,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub kind: BlockKind,
    pub pomodoros: u32,
}

#[derive(sqlx::FromRow)]
pub(crate) struct QuestionRow {
    pub id: String,
    pub discipline: String,
    pub statement: String,
}

#[derive(sqlx::FromRow)]
pub(crate) struct AlternativeRow {
    pub question_id: String,
    pub letter: String,
    pub text: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AreaCount {
    pub discipline: String,
    pub total: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PracticeSessionModel {
    pub id: i64,
    pub token: String,
    pub user_id: String,
    #[sqlx(try_from = "String")]
    pub status: SessionStatus,
    pub discipline: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionQuestionModel {
    pub position: i64,
    pub question_id: String,
    pub discipline: String,
    pub shown_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub question_id: String,
    pub session_id: Option<i64>,
    pub selected_letter: String,
    pub is_correct: bool,
    pub discipline: String,
    pub response_ms: i64,
    pub attempt: i64,
    pub answered_at: DateTime<Utc>,
}

/// An answer about to be appended to the history.
#[derive(Debug, Clone)]
pub struct NewAnswer<'a> {
    pub user_id: &'a str,
    pub session_id: i64,
    /// Session position of the question being answered.
    pub position: i64,
    pub question_id: &'a str,
    pub selected_letter: &'a str,
    pub is_correct: bool,
    pub discipline: &'a str,
    pub response_ms: i64,
    pub answered_at: DateTime<Utc>,
}
