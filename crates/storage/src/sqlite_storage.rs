//! SQLite storage backend for Weightwise.
//!
//! Each record is stored as a JSON document next to the columns that range
//! and ordering queries need. `external_id` carries a unique index so
//! re-imports are rejected by the database itself.

use std::path::Path;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::Row;
use weightwise_core::{Goal, GoalId, Observation, UserId};

use super::trait_::{Result, Storage, StorageError};

/// SQLite storage implementation.
#[derive(Clone)]
pub struct SqliteStorage {
    /// Database connection pool
    pool: sqlx::SqlitePool,
}

impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        StorageError::Database(e.to_string())
    }
}

impl SqliteStorage {
    /// Create a new SQLite storage instance.
    pub async fn new(db_url: &str) -> Result<Self> {
        let pool = sqlx::SqlitePool::connect(db_url).await?;

        let storage = Self { pool };
        storage.init_schema().await?;

        Ok(storage)
    }

    /// Open (creating if needed) a database file at `path`.
    pub async fn new_from_path(path: &Path) -> Result<Self> {
        let path = path
            .to_str()
            .ok_or_else(|| StorageError::Other(format!("Non UTF-8 path: {}", path.display())))?;
        Self::new(&format!("sqlite://{}?mode=rwc", path)).await
    }

    /// Create an in-memory SQLite storage for testing.
    pub async fn in_memory() -> Result<Self> {
        // A second connection would see a different in-memory database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let storage = Self { pool };
        storage.init_schema().await?;

        Ok(storage)
    }

    /// Initialize the database schema.
    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS observations (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                date TEXT NOT NULL,
                time TEXT,
                external_id TEXT UNIQUE,
                data TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS goals (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                target_date TEXT NOT NULL,
                is_achieved INTEGER NOT NULL,
                data TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_observations_user_date ON observations(user_id, date)",
        )
        .execute(&self.pool)
        .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_goals_user_target ON goals(user_id, target_date)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    fn decode<T: serde::de::DeserializeOwned>(row: &sqlx::sqlite::SqliteRow) -> Result<T> {
        let data: String = row.try_get("data")?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Check if the database is healthy.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await.is_ok()
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    // === Observation operations ===

    async fn save_observation(&mut self, observation: &Observation) -> Result<bool> {
        let data = serde_json::to_string(observation)?;

        let result = sqlx::query(
            "INSERT OR IGNORE INTO observations
                (id, user_id, date, time, external_id, data, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(observation.id.to_string())
        .bind(observation.user_id.as_str())
        .bind(observation.date.to_string())
        .bind(observation.time.map(|t| t.format("%H:%M:%S").to_string()))
        .bind(observation.external_id.as_deref())
        .bind(data)
        .bind(observation.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_observations(
        &self,
        user_id: &UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Observation>> {
        let rows = sqlx::query(
            "SELECT data FROM observations
            WHERE user_id = ? AND date >= ? AND date <= ?
            ORDER BY date ASC, time ASC, created_at ASC, rowid ASC",
        )
        .bind(user_id.as_str())
        .bind(from.to_string())
        .bind(to.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::decode).collect()
    }

    async fn find_latest_observation(&self, user_id: &UserId) -> Result<Option<Observation>> {
        let row = sqlx::query(
            "SELECT data FROM observations WHERE user_id = ?
            ORDER BY date DESC, time DESC, created_at DESC, rowid DESC LIMIT 1",
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::decode).transpose()
    }

    // === Goal operations ===

    async fn save_goal(&mut self, goal: &Goal) -> Result<()> {
        let data = serde_json::to_string(goal)?;

        sqlx::query(
            "INSERT OR REPLACE INTO goals
                (id, user_id, target_date, is_achieved, data, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(goal.id.to_string())
        .bind(goal.user_id.as_str())
        .bind(goal.target_date.to_string())
        .bind(goal.is_achieved)
        .bind(data)
        .bind(goal.created_at.to_rfc3339())
        .bind(goal.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_goal(&self, user_id: &UserId, id: GoalId) -> Result<Option<Goal>> {
        let row = sqlx::query("SELECT data FROM goals WHERE id = ? AND user_id = ?")
            .bind(id.to_string())
            .bind(user_id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::decode).transpose()
    }

    async fn list_goals(&self, user_id: &UserId, active_only: bool) -> Result<Vec<Goal>> {
        let sql = if active_only {
            "SELECT data FROM goals WHERE user_id = ? AND is_achieved = 0 \
             ORDER BY target_date ASC, created_at ASC"
        } else {
            "SELECT data FROM goals WHERE user_id = ? ORDER BY target_date ASC, created_at ASC"
        };

        let rows = sqlx::query(sql)
            .bind(user_id.as_str())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::decode).collect()
    }

    async fn delete_goal(&mut self, user_id: &UserId, id: GoalId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM goals WHERE id = ? AND user_id = ?")
            .bind(id.to_string())
            .bind(user_id.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
