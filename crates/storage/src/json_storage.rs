//! JSON file storage implementation.
//!
//! Stores one JSON file per record under `goals/` and `observations/` in the
//! data directory. Queries read the directory and filter in memory, which is
//! fine for a single person's weight history.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tokio::fs;
use tracing::{debug, warn};
use weightwise_core::{Goal, GoalId, Observation, ObservationId, UserId};

use super::trait_::{sort_goals, sort_observations, Result, Storage};

/// File-based JSON storage backend.
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    /// Create storage rooted at `root`, creating the record directories.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(root.join("goals")).await?;
        fs::create_dir_all(root.join("observations")).await?;

        Ok(Self { root })
    }

    fn goal_path(&self, id: GoalId) -> PathBuf {
        self.root.join("goals").join(format!("{}.json", id))
    }

    fn observation_path(&self, id: ObservationId) -> PathBuf {
        self.root.join("observations").join(format!("{}.json", id))
    }

    async fn user_observations(&self, user_id: &UserId) -> Result<Vec<Observation>> {
        let all: Vec<Observation> = list_dir(&self.root.join("observations")).await?;
        Ok(all.into_iter().filter(|o| &o.user_id == user_id).collect())
    }
}

#[async_trait::async_trait]
impl Storage for JsonStorage {
    async fn save_observation(&mut self, observation: &Observation) -> Result<bool> {
        if let Some(external_id) = &observation.external_id {
            let all: Vec<Observation> = list_dir(&self.root.join("observations")).await?;
            if all.iter().any(|o| o.external_id.as_ref() == Some(external_id)) {
                debug!("Skipping observation with known external id {}", external_id);
                return Ok(false);
            }
        }

        let json = serde_json::to_string_pretty(observation)?;
        fs::write(self.observation_path(observation.id), json.as_bytes()).await?;
        Ok(true)
    }

    async fn find_observations(
        &self,
        user_id: &UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Observation>> {
        let mut observations: Vec<Observation> = self
            .user_observations(user_id)
            .await?
            .into_iter()
            .filter(|o| o.date >= from && o.date <= to)
            .collect();
        sort_observations(&mut observations);
        Ok(observations)
    }

    async fn find_latest_observation(&self, user_id: &UserId) -> Result<Option<Observation>> {
        let mut observations = self.user_observations(user_id).await?;
        sort_observations(&mut observations);
        Ok(observations.pop())
    }

    async fn save_goal(&mut self, goal: &Goal) -> Result<()> {
        let json = serde_json::to_string_pretty(goal)?;
        fs::write(self.goal_path(goal.id), json.as_bytes()).await?;
        Ok(())
    }

    async fn find_goal(&self, user_id: &UserId, id: GoalId) -> Result<Option<Goal>> {
        let goal: Option<Goal> = read_json(&self.goal_path(id)).await?;
        Ok(goal.filter(|g| &g.user_id == user_id))
    }

    async fn list_goals(&self, user_id: &UserId, active_only: bool) -> Result<Vec<Goal>> {
        let all: Vec<Goal> = list_dir(&self.root.join("goals")).await?;
        let mut goals: Vec<Goal> = all
            .into_iter()
            .filter(|g| &g.user_id == user_id)
            .filter(|g| !active_only || !g.is_achieved)
            .collect();
        sort_goals(&mut goals);
        Ok(goals)
    }

    async fn delete_goal(&mut self, user_id: &UserId, id: GoalId) -> Result<bool> {
        if self.find_goal(user_id, id).await?.is_none() {
            return Ok(false);
        }
        match fs::remove_file(self.goal_path(id)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn list_dir<T: serde::de::DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let mut items = Vec::new();
    let mut rd = fs::read_dir(dir).await?;
    while let Some(entry) = rd.next_entry().await? {
        if entry.path().extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        let path = entry.path();
        match read_json(&path).await {
            Ok(Some(item)) => items.push(item),
            Ok(None) => {}
            Err(e) => {
                warn!("Unreadable record {}: {}", path.display(), e);
                return Err(e);
            }
        }
    }
    Ok(items)
}
