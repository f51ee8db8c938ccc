use color_eyre::Result;
use serde::Serialize;

use super::models::{AlternativeRow, AreaCount, QuestionRow};
use super::Db;
use crate::models::{Alternative, Question};
use crate::names;
use crate::practice::PoolEntry;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceOutcome {
    pub removed: u64,
    pub batches: usize,
}

impl Db {
    /// Deletes every stored question and writes `questions` in batches of
    /// [`names::IMPORT_BATCH_SIZE`]. Each batch commits on its own, so a
    /// failure part-way leaves the earlier batches in place.
    pub async fn replace_questions(&self, questions: &[Question]) -> Result<ReplaceOutcome> {
        let removed = sqlx::query("DELETE FROM questions")
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!("removed {removed} questions before import");

        let mut batches = 0;
        for (batch_idx, chunk) in questions.chunks(names::IMPORT_BATCH_SIZE).enumerate() {
            let mut tx = self.pool.begin().await?;

            for (offset, question) in chunk.iter().enumerate() {
                let position = (batch_idx * names::IMPORT_BATCH_SIZE + offset) as i64;

                sqlx::query(
                    "INSERT INTO questions (id, discipline, statement, position) VALUES (?, ?, ?, ?)",
                )
                .bind(&question.id)
                .bind(&question.discipline)
                .bind(&question.statement)
                .bind(position)
                .execute(&mut *tx)
                .await?;

                for alt in &question.alternatives {
                    sqlx::query(
                        "INSERT INTO alternatives (question_id, letter, text, is_correct) VALUES (?, ?, ?, ?)",
                    )
                    .bind(&question.id)
                    .bind(&alt.letter)
                    .bind(&alt.text)
                    .bind(alt.is_correct)
                    .execute(&mut *tx)
                    .await?;
                }
            }

            tx.commit().await?;
            batches += 1;

            tracing::info!(
                "import batch {} committed ({} questions)",
                batch_idx + 1,
                chunk.len()
            );
        }

        Ok(ReplaceOutcome { removed, batches })
    }

    pub async fn questions_count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    pub async fn question_stats(&self) -> Result<Vec<AreaCount>> {
        let stats = sqlx::query_as::<_, AreaCount>(
            r#"
            SELECT discipline, COUNT(*) AS total
            FROM questions
            GROUP BY discipline
            ORDER BY discipline
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(stats)
    }

    /// Ids of the questions eligible for practice, optionally limited to one
    /// discipline.
    pub async fn question_pool(&self, discipline: Option<&str>) -> Result<Vec<PoolEntry>> {
        let pool = sqlx::query_as::<_, PoolEntry>(
            r#"
            SELECT id, discipline FROM questions
            WHERE ? IS NULL OR discipline = ?
            ORDER BY position
            "#,
        )
        .bind(discipline)
        .bind(discipline)
        .fetch_all(&self.pool)
        .await?;

        Ok(pool)
    }

    pub async fn get_question(&self, question_id: &str) -> Result<Option<Question>> {
        let Some(row) = sqlx::query_as::<_, QuestionRow>(
            "SELECT id, discipline, statement FROM questions WHERE id = ?",
        )
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let alternatives = sqlx::query_as::<_, AlternativeRow>(
            "SELECT question_id, letter, text, is_correct FROM alternatives WHERE question_id = ? ORDER BY letter",
        )
        .bind(question_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(assemble(row, alternatives)))
    }
}

fn assemble(row: QuestionRow, alternatives: Vec<AlternativeRow>) -> Question {
    Question {
        id: row.id,
        discipline: row.discipline,
        statement: row.statement,
        alternatives: alternatives
            .into_iter()
            .map(|a| Alternative {
                letter: a.letter,
                text: a.text,
                is_correct: a.is_correct,
            })
            .collect(),
    }
}
