// Database module - provides data access layer

use std::str::FromStr;

use color_eyre::{eyre::ensure, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

// Re-export models for convenience
pub mod models;
pub use models::*;

mod block;
mod history;
mod migrations;
mod practice;
mod question;
mod user;

pub use question::ReplaceOutcome;

// Main database handle
#[derive(Clone)]
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    /// Connects to a SQLite database (`sqlite://path` or `sqlite::memory:`),
    /// creating the file if needed, and applies pending migrations.
    pub async fn new(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        // Verify connection
        let one: i64 = sqlx::query_scalar("SELECT 1").fetch_one(&pool).await?;
        ensure!(one == 1, "connection check failed");

        migrations::run(&pool).await?;

        tracing::info!("database connection has been verified");

        Ok(Self { pool })
    }
}
