use color_eyre::Result;

use super::models::{HistoryEntry, NewAnswer};
use super::Db;

const HISTORY_COLUMNS: &str = "question_id, session_id, selected_letter, is_correct, discipline, response_ms, attempt, answered_at";

impl Db {
    /// Appends an answer to the user's history. The attempt number counts
    /// previous answers by the same user to the same question.
    ///
    /// The row is only written while `answer.position` is still the next
    /// unanswered position of the session; otherwise `None` is returned and
    /// nothing is stored.
    pub async fn record_answer(&self, answer: NewAnswer<'_>) -> Result<Option<HistoryEntry>> {
        // Position check, attempt count and insert run as a single statement.
        let inserted = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO question_history
                (user_id, session_id, position, question_id, selected_letter, is_correct, discipline, response_ms, attempt, answered_at)
            SELECT ?, ?, ?, ?, ?, ?, ?, ?,
                (SELECT COUNT(*) FROM question_history WHERE user_id = ? AND question_id = ?) + 1,
                ?
            WHERE (SELECT COUNT(*) FROM question_history WHERE session_id = ?) = ?
            RETURNING attempt
            "#,
        )
        .bind(answer.user_id)
        .bind(answer.session_id)
        .bind(answer.position)
        .bind(answer.question_id)
        .bind(answer.selected_letter)
        .bind(answer.is_correct)
        .bind(answer.discipline)
        .bind(answer.response_ms)
        .bind(answer.user_id)
        .bind(answer.question_id)
        .bind(answer.answered_at)
        .bind(answer.session_id)
        .bind(answer.position)
        .fetch_optional(&self.pool)
        .await;

        let attempt = match inserted {
            Ok(Some(attempt)) => attempt,
            Ok(None) => {
                tracing::warn!(
                    "session={} position={} was already answered",
                    answer.session_id,
                    answer.position
                );
                return Ok(None);
            }
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                tracing::warn!(
                    "duplicate answer for session={} position={}",
                    answer.session_id,
                    answer.position
                );
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            "answer recorded for session={} question={}: correct={}",
            answer.session_id,
            answer.question_id,
            answer.is_correct
        );

        Ok(Some(HistoryEntry {
            question_id: answer.question_id.to_string(),
            session_id: Some(answer.session_id),
            selected_letter: answer.selected_letter.to_string(),
            is_correct: answer.is_correct,
            discipline: answer.discipline.to_string(),
            response_ms: answer.response_ms,
            attempt,
            answered_at: answer.answered_at,
        }))
    }

    /// A user's answers, newest first.
    pub async fn history(&self, user_id: &str) -> Result<Vec<HistoryEntry>> {
        let entries = sqlx::query_as::<_, HistoryEntry>(&format!(
            "SELECT {HISTORY_COLUMNS} FROM question_history WHERE user_id = ? ORDER BY answered_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    pub async fn session_answers(&self, session_id: i64) -> Result<Vec<HistoryEntry>> {
        let entries = sqlx::query_as::<_, HistoryEntry>(&format!(
            "SELECT {HISTORY_COLUMNS} FROM question_history WHERE session_id = ? ORDER BY id"
        ))
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
