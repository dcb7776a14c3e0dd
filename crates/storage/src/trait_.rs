//! Storage trait abstraction.

use async_trait::async_trait;
use chrono::NaiveDate;
use weightwise_core::{Goal, GoalId, Observation, UserId};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Item not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Observation and goal store.
///
/// Every query is scoped to one user. Backends are plugged in behind this
/// trait; the analytics layer never sees which one is in use.
#[async_trait]
pub trait Storage: Send + Sync {
    // === Observation operations ===

    /// Store an observation.
    ///
    /// Returns `false` without writing when another observation already
    /// carries the same `external_id`.
    async fn save_observation(&mut self, observation: &Observation) -> Result<bool>;

    /// Observations for `user_id` dated within `[from, to]`, ordered by date,
    /// then time of day (missing times first), then insertion order.
    async fn find_observations(
        &self,
        user_id: &UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Observation>>;

    /// Most recent observation for `user_id` by date, then time of day.
    async fn find_latest_observation(&self, user_id: &UserId) -> Result<Option<Observation>>;

    // === Goal operations ===

    /// Save a goal (create or update).
    async fn save_goal(&mut self, goal: &Goal) -> Result<()>;

    /// Load a goal owned by `user_id`.
    async fn find_goal(&self, user_id: &UserId, id: GoalId) -> Result<Option<Goal>>;

    /// Goals owned by `user_id`, ordered by target date.
    async fn list_goals(&self, user_id: &UserId, active_only: bool) -> Result<Vec<Goal>>;

    /// Delete a goal. Returns `false` when it did not exist.
    async fn delete_goal(&mut self, user_id: &UserId, id: GoalId) -> Result<bool>;

    /// The unachieved goal with the earliest target date.
    async fn find_active_goal(&self, user_id: &UserId) -> Result<Option<Goal>> {
        Ok(self.list_goals(user_id, true).await?.into_iter().next())
    }
}

/// Sort observations into range-query order.
pub(crate) fn sort_observations(observations: &mut [Observation]) {
    observations.sort_by(|a, b| {
        a.sort_key()
            .cmp(&b.sort_key())
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
}

/// Sort goals by target date, earliest first.
pub(crate) fn sort_goals(goals: &mut [Goal]) {
    goals.sort_by(|a, b| {
        a.target_date
            .cmp(&b.target_date)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
}
