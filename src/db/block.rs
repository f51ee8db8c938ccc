use chrono::{NaiveDate, NaiveTime};
use color_eyre::Result;
use ulid::Ulid;

use super::models::{NewBlock, StudyBlock};
use super::Db;
use crate::planner::PlannedBlock;

const BLOCK_COLUMNS: &str =
    "id, user_id, discipline_id, title, date, start_time, end_time, kind, pomodoros, completed";

impl Db {
    pub async fn list_blocks(
        &self,
        user_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<StudyBlock>> {
        let blocks = sqlx::query_as::<_, StudyBlock>(&format!(
            r#"
            SELECT {BLOCK_COLUMNS} FROM study_blocks
            WHERE user_id = ?
              AND (? IS NULL OR date >= ?)
              AND (? IS NULL OR date <= ?)
            ORDER BY date, start_time
            "#
        ))
        .bind(user_id)
        .bind(from)
        .bind(from)
        .bind(to)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(blocks)
    }

    pub async fn get_block(&self, user_id: &str, block_id: &str) -> Result<Option<StudyBlock>> {
        let block = sqlx::query_as::<_, StudyBlock>(&format!(
            "SELECT {BLOCK_COLUMNS} FROM study_blocks WHERE id = ? AND user_id = ?"
        ))
        .bind(block_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(block)
    }

    pub async fn create_block(&self, user_id: &str, block: NewBlock) -> Result<StudyBlock> {
        let id = Ulid::new().to_string();

        sqlx::query(
            r#"
            INSERT INTO study_blocks
                (id, user_id, discipline_id, title, date, start_time, end_time, kind, pomodoros, completed)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, FALSE)
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(&block.discipline_id)
        .bind(&block.title)
        .bind(block.date)
        .bind(block.start_time)
        .bind(block.end_time)
        .bind(block.kind.as_str())
        .bind(block.pomodoros)
        .execute(&self.pool)
        .await?;

        tracing::info!("block {id} created for user_id={user_id}");
        Ok(StudyBlock {
            id,
            user_id: user_id.to_string(),
            discipline_id: block.discipline_id,
            title: block.title,
            date: block.date,
            start_time: block.start_time,
            end_time: block.end_time,
            kind: block.kind,
            pomodoros: block.pomodoros,
            completed: false,
        })
    }

    /// Replaces all of a user's blocks with a freshly generated plan.
    pub async fn replace_blocks(&self, user_id: &str, blocks: &[PlannedBlock]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM study_blocks WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        for block in blocks {
            sqlx::query(
                r#"
                INSERT INTO study_blocks
                    (id, user_id, discipline_id, title, date, start_time, end_time, kind, pomodoros, completed)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, FALSE)
                "#,
            )
            .bind(&block.id)
            .bind(user_id)
            .bind(&block.discipline_id)
            .bind(&block.title)
            .bind(block.date)
            .bind(block.start_time)
            .bind(block.end_time)
            .bind(block.kind.as_str())
            .bind(block.pomodoros)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            "plan replaced for user_id={user_id}: removed={removed}, inserted={}",
            blocks.len()
        );
        Ok(())
    }

    /// Flips the completed flag; `None` when the block does not belong to the user.
    pub async fn toggle_block(&self, user_id: &str, block_id: &str) -> Result<Option<StudyBlock>> {
        let updated = sqlx::query(
            "UPDATE study_blocks SET completed = NOT completed WHERE id = ? AND user_id = ?",
        )
        .bind(block_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Ok(None);
        }
        self.get_block(user_id, block_id).await
    }

    pub async fn move_block(
        &self,
        user_id: &str,
        block_id: &str,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<Option<StudyBlock>> {
        let updated = sqlx::query(
            "UPDATE study_blocks SET date = ?, start_time = ?, end_time = ? WHERE id = ? AND user_id = ?",
        )
        .bind(date)
        .bind(start_time)
        .bind(end_time)
        .bind(block_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Ok(None);
        }

        tracing::info!("block {block_id} moved to {date} {start_time}");
        self.get_block(user_id, block_id).await
    }

    pub async fn delete_block(&self, user_id: &str, block_id: &str) -> Result<bool> {
        let deleted = sqlx::query("DELETE FROM study_blocks WHERE id = ? AND user_id = ?")
            .bind(block_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}
