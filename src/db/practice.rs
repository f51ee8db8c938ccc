use chrono::{DateTime, Utc};
use color_eyre::{eyre::OptionExt, Result};
use ulid::Ulid;

use super::models::{PracticeSessionModel, SessionQuestionModel};
use super::Db;
use crate::practice::{PoolEntry, SessionStatus};

impl Db {
    /// Stores a drawn practice session and returns its token. The session
    /// starts out in progress.
    pub async fn create_practice_session(
        &self,
        user_id: &str,
        discipline: Option<&str>,
        questions: &[PoolEntry],
    ) -> Result<String> {
        let token = Ulid::new().to_string();

        // Transaction: insert session + session_questions atomically
        let mut tx = self.pool.begin().await?;

        let session_id = sqlx::query(
            "INSERT INTO practice_sessions (token, user_id, status, discipline) VALUES (?, ?, ?, ?)",
        )
        .bind(&token)
        .bind(user_id)
        .bind(SessionStatus::InProgress.as_str())
        .bind(discipline)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        for (position, entry) in questions.iter().enumerate() {
            sqlx::query(
                "INSERT INTO session_questions (session_id, position, question_id, discipline) VALUES (?, ?, ?, ?)",
            )
            .bind(session_id)
            .bind(position as i64)
            .bind(&entry.id)
            .bind(&entry.discipline)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            "practice session created: session_id={session_id}, questions={}, user_id={user_id}",
            questions.len()
        );
        Ok(token)
    }

    pub async fn get_practice_session(&self, token: &str) -> Result<Option<PracticeSessionModel>> {
        let session = sqlx::query_as::<_, PracticeSessionModel>(
            "SELECT id, token, user_id, status, discipline FROM practice_sessions WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    pub async fn session_questions(&self, session_id: i64) -> Result<Vec<SessionQuestionModel>> {
        let questions = sqlx::query_as::<_, SessionQuestionModel>(
            r#"
            SELECT position, question_id, discipline, shown_at
            FROM session_questions
            WHERE session_id = ?
            ORDER BY position
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }

    /// Number of answered questions, which is also the position of the next
    /// question to show.
    pub async fn current_position(&self, session_id: i64) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM question_history WHERE session_id = ?")
                .bind(session_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// Records when a question was first displayed and returns that instant.
    pub async fn mark_shown(
        &self,
        session_id: i64,
        position: i64,
        now: DateTime<Utc>,
    ) -> Result<DateTime<Utc>> {
        sqlx::query(
            "UPDATE session_questions SET shown_at = ? WHERE session_id = ? AND position = ? AND shown_at IS NULL",
        )
        .bind(now)
        .bind(session_id)
        .bind(position)
        .execute(&self.pool)
        .await?;

        let shown_at = sqlx::query_scalar::<_, Option<DateTime<Utc>>>(
            "SELECT shown_at FROM session_questions WHERE session_id = ? AND position = ?",
        )
        .bind(session_id)
        .bind(position)
        .fetch_optional(&self.pool)
        .await?
        .flatten();

        shown_at.ok_or_eyre("session question not found")
    }

    pub async fn set_session_status(
        &self,
        session_id: i64,
        status: SessionStatus,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let finished_at = (status == SessionStatus::Finished).then_some(now);

        sqlx::query("UPDATE practice_sessions SET status = ?, finished_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(finished_at)
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        tracing::info!("practice session {session_id} is now {status}");
        Ok(())
    }
}
