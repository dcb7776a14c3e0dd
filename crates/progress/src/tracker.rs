//! Weight tracking service.
//!
//! Fetches goals and observations from a [`Storage`] backend once per call and
//! hands them to the pure engines.

use chrono::{Days, NaiveDate};
use tracing::{debug, info};
use weightwise_core::{
    check_weight, Goal, GoalDraft, GoalId, GoalUpdate, GoalView, NewObservation, Observation,
    ProjectionReport, TrajectoryReport, UserId, WeightSummary,
};
use weightwise_storage::Storage;

use crate::config::AnalyticsConfig;
use crate::error::{AnalyticsError, Result};
use crate::projection::project;
use crate::scorer::progress_percentage;
use crate::summary::summarize;
use crate::trajectory::{trajectory_end, trajectory_report};

/// Goal and observation service for one storage backend.
pub struct WeightTracker<S: Storage> {
    storage: S,
    config: AnalyticsConfig,
}

impl<S: Storage> WeightTracker<S> {
    /// Create a tracker with the default configuration.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            config: AnalyticsConfig::default(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: AnalyticsConfig) -> Self {
        self.config = config;
        self
    }

    /// Borrow the storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Mutably borrow the storage backend.
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    // === Observations ===

    /// Record an observation. Returns `None` when its external id is already
    /// stored.
    pub async fn record_observation(
        &mut self,
        user_id: &UserId,
        fields: NewObservation,
    ) -> Result<Option<Observation>> {
        check_weight(fields.weight)?;
        let observation = Observation::new(user_id.clone(), fields);
        if self.storage.save_observation(&observation).await? {
            debug!("Recorded {} kg for {} on {}", observation.weight, user_id, observation.date);
            Ok(Some(observation))
        } else {
            Ok(None)
        }
    }

    /// Observations for `user_id` within `[from, to]`.
    pub async fn observations(
        &self,
        user_id: &UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Observation>> {
        if from > to {
            return Err(AnalyticsError::InvalidInput(format!(
                "from date {} is after to date {}",
                from, to
            )));
        }
        Ok(self.storage.find_observations(user_id, from, to).await?)
    }

    // === Goals ===

    /// Create a goal starting today.
    ///
    /// The start weight is the user's latest observation, falling back to the
    /// draft's `start_weight` when the user has none.
    pub async fn create_goal(
        &mut self,
        user_id: &UserId,
        draft: GoalDraft,
        today: NaiveDate,
    ) -> Result<Goal> {
        check_weight(draft.target_weight)?;

        let latest = self.storage.find_latest_observation(user_id).await?;
        let start_weight = match (latest, draft.start_weight) {
            (Some(observation), _) => observation.weight,
            (None, Some(weight)) => check_weight(weight)?,
            (None, None) => {
                return Err(AnalyticsError::InvalidInput(
                    "No weight data available and no start_weight provided".to_string(),
                ))
            }
        };

        let goal = Goal::new(
            user_id.clone(),
            draft.target_weight,
            draft.target_date,
            start_weight,
            today,
        )
        .with_description(draft.description);
        self.storage.save_goal(&goal).await?;

        info!(
            "Created goal {} for {}: {} kg -> {} kg by {}",
            goal.id, user_id, goal.start_weight, goal.target_weight, goal.target_date
        );
        Ok(goal)
    }

    /// Apply a partial update to a goal.
    pub async fn update_goal(
        &mut self,
        user_id: &UserId,
        id: GoalId,
        update: GoalUpdate,
        today: NaiveDate,
    ) -> Result<Goal> {
        if let Some(weight) = update.target_weight {
            check_weight(weight)?;
        }

        let mut goal = self.load_goal(user_id, id).await?;
        let was_achieved = goal.is_achieved;
        goal.apply(update, today);
        self.storage.save_goal(&goal).await?;

        if goal.is_achieved && !was_achieved {
            info!("Goal {} achieved on {}", goal.id, today);
        }
        Ok(goal)
    }

    /// Delete a goal.
    pub async fn delete_goal(&mut self, user_id: &UserId, id: GoalId) -> Result<()> {
        if !self.storage.delete_goal(user_id, id).await? {
            return Err(goal_not_found(id));
        }
        info!("Deleted goal {}", id);
        Ok(())
    }

    /// Goals for `user_id` ordered by target date, with derived fields.
    pub async fn list_goals(
        &self,
        user_id: &UserId,
        active_only: bool,
        today: NaiveDate,
    ) -> Result<Vec<GoalView>> {
        let goals = self.storage.list_goals(user_id, active_only).await?;
        let latest = self.latest_weight_for_scoring(user_id).await;
        Ok(goals.into_iter().map(|goal| goal_view(goal, latest, today)).collect())
    }

    /// A single goal with derived fields.
    pub async fn goal_view(
        &self,
        user_id: &UserId,
        id: GoalId,
        today: NaiveDate,
    ) -> Result<GoalView> {
        let goal = self.load_goal(user_id, id).await?;
        let latest = self.latest_weight_for_scoring(user_id).await;
        Ok(goal_view(goal, latest, today))
    }

    /// The goal named by `id`, or the active goal when `id` is `None`.
    pub async fn resolve_goal(&self, user_id: &UserId, id: Option<GoalId>) -> Result<Goal> {
        match id {
            Some(id) => self.load_goal(user_id, id).await,
            None => self
                .storage
                .find_active_goal(user_id)
                .await?
                .ok_or_else(|| AnalyticsError::NotFound("No active goal found".to_string())),
        }
    }

    // === Analytics ===

    /// Daily actual-versus-ideal comparison from the goal's start to today.
    pub async fn weight_diff(
        &self,
        user_id: &UserId,
        goal_id: Option<GoalId>,
        today: NaiveDate,
    ) -> Result<TrajectoryReport> {
        let goal = self.resolve_goal(user_id, goal_id).await?;

        let span = (trajectory_end(&goal, today) - goal.start_date).num_days();
        if span > self.config.max_trajectory_days {
            return Err(AnalyticsError::InvalidInput(format!(
                "Goal window of {} days exceeds the {} day limit",
                span, self.config.max_trajectory_days
            )));
        }

        let observations = if goal.start_date <= today {
            self.storage.find_observations(user_id, goal.start_date, today).await?
        } else {
            Vec::new()
        };
        let current_weight = self
            .storage
            .find_latest_observation(user_id)
            .await?
            .map(|o| o.weight);

        let view = goal_view(goal, current_weight, today);
        let report = trajectory_report(view, &observations, current_weight, today);
        debug!(
            "Trajectory for goal {}: {} days, {} observations",
            report.goal.goal.id,
            report.daily_weight_diffs.len(),
            observations.len()
        );
        Ok(report)
    }

    /// Forecast the next `horizon_days` days (default from config).
    pub async fn weight_projection(
        &self,
        user_id: &UserId,
        goal_id: Option<GoalId>,
        horizon_days: Option<i64>,
        today: NaiveDate,
    ) -> Result<ProjectionReport> {
        let horizon = self.validate_horizon(horizon_days)?;
        let goal = self.resolve_goal(user_id, goal_id).await?;

        let window_start = today
            .checked_sub_days(Days::new(self.config.recent_window_days))
            .unwrap_or(NaiveDate::MIN);
        let recent = self.storage.find_observations(user_id, window_start, today).await?;
        let latest = self
            .storage
            .find_latest_observation(user_id)
            .await?
            .map(|o| o.weight);
        let latest_weight = latest.unwrap_or(goal.start_weight);

        let outcome = project(&goal, &recent, latest_weight, horizon, today);
        debug!(
            "Projection for goal {}: rate {:.3} kg/day over {} recent observations",
            goal.id,
            outcome.avg_change_per_day,
            recent.len()
        );

        Ok(ProjectionReport {
            goal: goal_view(goal, latest, today),
            latest_weight,
            avg_change_per_day: outcome.avg_change_per_day,
            projected_completion_date: outcome.projected_completion_date,
            weight_projections: outcome.weight_projections,
            insufficient_data: outcome.insufficient_data,
        })
    }

    /// Statistics for `[from, to]`, defaulting to the configured window
    /// ending today.
    pub async fn weight_summary(
        &self,
        user_id: &UserId,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<WeightSummary> {
        let to = to.unwrap_or(today);
        let from = match from {
            Some(from) => from,
            None => today
                .checked_sub_days(Days::new(self.config.summary_window_days))
                .unwrap_or(NaiveDate::MIN),
        };

        let observations = self.observations(user_id, from, to).await?;
        summarize(&observations, from, to).ok_or_else(|| {
            AnalyticsError::NotFound(
                "No weight data available for the specified period".to_string(),
            )
        })
    }

    fn validate_horizon(&self, horizon_days: Option<i64>) -> Result<u32> {
        let horizon = horizon_days.unwrap_or(self.config.default_horizon_days);
        if horizon < 1 || horizon > self.config.max_horizon_days {
            return Err(AnalyticsError::InvalidInput(format!(
                "days must be between 1 and {}, got {}",
                self.config.max_horizon_days, horizon
            )));
        }
        u32::try_from(horizon)
            .map_err(|_| AnalyticsError::InvalidInput(format!("days out of range: {}", horizon)))
    }

    async fn load_goal(&self, user_id: &UserId, id: GoalId) -> Result<Goal> {
        self.storage
            .find_goal(user_id, id)
            .await?
            .ok_or_else(|| goal_not_found(id))
    }

    /// Latest weight for progress scoring. Store failures count as "no
    /// weight" so scoring never fails.
    async fn latest_weight_for_scoring(&self, user_id: &UserId) -> Option<f64> {
        match self.storage.find_latest_observation(user_id).await {
            Ok(latest) => latest.map(|o| o.weight),
            Err(e) => {
                debug!("Scoring without latest weight for {}: {}", user_id, e);
                None
            }
        }
    }
}

/// Attach the derived fields to a goal.
pub fn goal_view(goal: Goal, latest_weight: Option<f64>, today: NaiveDate) -> GoalView {
    GoalView {
        days_remaining: goal.days_remaining(today),
        progress_percentage: progress_percentage(&goal, latest_weight),
        goal,
    }
}

fn goal_not_found(id: GoalId) -> AnalyticsError {
    AnalyticsError::NotFound(format!("Goal {} not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use weightwise_storage::JsonStorage;

    fn day(n: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(n)
    }

    fn alice() -> UserId {
        UserId::new("alice")
    }

    async fn tracker(dir: &tempfile::TempDir) -> WeightTracker<JsonStorage> {
        WeightTracker::new(JsonStorage::new(dir.path()).await.unwrap())
    }

    async fn record(tracker: &mut WeightTracker<JsonStorage>, n: i64, weight: f64) {
        tracker
            .record_observation(
                &alice(),
                NewObservation { date: day(n), weight, ..Default::default() },
            )
            .await
            .unwrap();
    }

    fn draft(target_weight: f64, target_day: i64, start_weight: Option<f64>) -> GoalDraft {
        GoalDraft {
            target_weight,
            target_date: day(target_day),
            start_weight,
            description: None,
        }
    }

    #[tokio::test]
    async fn test_create_goal_prefers_latest_observation() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = tracker(&dir).await;
        record(&mut tracker, 0, 81.2).await;

        let goal = tracker
            .create_goal(&alice(), draft(70.0, 20, Some(90.0)), day(1))
            .await
            .unwrap();
        assert_eq!(goal.start_weight, 81.2);
        assert_eq!(goal.start_date, day(1));
    }

    #[tokio::test]
    async fn test_create_goal_needs_some_start_weight() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = tracker(&dir).await;

        let err = tracker.create_goal(&alice(), draft(70.0, 20, None), day(0)).await.unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidInput(_)));

        let goal = tracker
            .create_goal(&alice(), draft(70.0, 20, Some(80.0)), day(0))
            .await
            .unwrap();
        assert_eq!(goal.start_weight, 80.0);
    }

    #[tokio::test]
    async fn test_record_rejects_non_positive_weight() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = tracker(&dir).await;
        let err = tracker
            .record_observation(
                &alice(),
                NewObservation { date: day(0), weight: 0.0, ..Default::default() },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_update_marks_achieved_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = tracker(&dir).await;
        let goal = tracker
            .create_goal(&alice(), draft(70.0, 20, Some(80.0)), day(0))
            .await
            .unwrap();

        let achieve = GoalUpdate { is_achieved: Some(true), ..Default::default() };
        let updated = tracker
            .update_goal(&alice(), goal.id, achieve.clone(), day(5))
            .await
            .unwrap();
        assert_eq!(updated.achieved_date, Some(day(5)));

        let again = tracker.update_goal(&alice(), goal.id, achieve, day(9)).await.unwrap();
        assert_eq!(again.achieved_date, Some(day(5)));

        let view = tracker.goal_view(&alice(), goal.id, day(9)).await.unwrap();
        assert_eq!(view.progress_percentage, 100.0);
    }

    #[tokio::test]
    async fn test_missing_goal_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = tracker(&dir).await;
        let id = GoalId::new();

        assert!(matches!(
            tracker.update_goal(&alice(), id, GoalUpdate::default(), day(0)).await,
            Err(AnalyticsError::NotFound(_))
        ));
        assert!(matches!(
            tracker.delete_goal(&alice(), id).await,
            Err(AnalyticsError::NotFound(_))
        ));
        assert!(matches!(
            tracker.weight_diff(&alice(), Some(id), day(0)).await,
            Err(AnalyticsError::NotFound(_))
        ));
        assert!(matches!(
            tracker.weight_diff(&alice(), None, day(0)).await,
            Err(AnalyticsError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_goals_are_scoped_to_user() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = tracker(&dir).await;
        let goal = tracker
            .create_goal(&alice(), draft(70.0, 20, Some(80.0)), day(0))
            .await
            .unwrap();

        let bob = UserId::new("bob");
        assert!(matches!(
            tracker.goal_view(&bob, goal.id, day(0)).await,
            Err(AnalyticsError::NotFound(_))
        ));
        assert!(tracker.list_goals(&bob, false, day(0)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_weight_diff_uses_active_goal() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = tracker(&dir).await;
        tracker.create_goal(&alice(), draft(60.0, 90, Some(80.0)), day(0)).await.unwrap();
        let urgent = tracker
            .create_goal(&alice(), draft(70.0, 20, Some(80.0)), day(0))
            .await
            .unwrap();
        record(&mut tracker, 0, 80.0).await;
        record(&mut tracker, 4, 78.4).await;

        let report = tracker.weight_diff(&alice(), None, day(4)).await.unwrap();
        assert_eq!(report.goal.goal.id, urgent.id);
        assert_eq!(report.current_weight, Some(78.4));
        assert_eq!(report.weight_to_lose, Some(8.4));
        assert_eq!(report.days_remaining, 16);
        assert_eq!(report.daily_weight_diffs.len(), 5);
        assert_eq!(report.daily_weight_diffs[4].difference, Some(0.4));
        assert!((report.goal.progress_percentage - 16.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_weight_diff_rejects_huge_window() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = tracker(&dir).await;
        let goal = tracker
            .create_goal(&alice(), draft(70.0, 10_000, Some(80.0)), day(0))
            .await
            .unwrap();

        let err = tracker.weight_diff(&alice(), Some(goal.id), day(5000)).await.unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_projection_falls_back_to_start_weight() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = tracker(&dir).await;
        tracker.create_goal(&alice(), draft(70.0, 20, Some(80.0)), day(0)).await.unwrap();

        let report = tracker.weight_projection(&alice(), None, Some(5), day(0)).await.unwrap();
        assert!(report.insufficient_data);
        assert_eq!(report.latest_weight, 80.0);
        assert_eq!(report.avg_change_per_day, -0.5);
        assert_eq!(report.projected_completion_date, Some(day(20)));
        assert_eq!(report.weight_projections.len(), 5);
    }

    #[tokio::test]
    async fn test_projection_uses_recent_window_only() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = tracker(&dir).await;
        tracker.create_goal(&alice(), draft(70.0, 40, Some(80.0)), day(0)).await.unwrap();
        // Outside the seven day window
        record(&mut tracker, 1, 90.0).await;
        record(&mut tracker, 6, 79.0).await;
        record(&mut tracker, 10, 77.0).await;

        let report = tracker.weight_projection(&alice(), None, None, day(10)).await.unwrap();
        assert!(!report.insufficient_data);
        assert_eq!(report.avg_change_per_day, -0.5);
        assert_eq!(report.latest_weight, 77.0);
        assert_eq!(report.weight_projections.len(), 30);
        assert_eq!(report.projected_completion_date, Some(day(24)));
    }

    #[tokio::test]
    async fn test_projection_rejects_bad_horizon() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = tracker(&dir).await;
        tracker.create_goal(&alice(), draft(70.0, 20, Some(80.0)), day(0)).await.unwrap();

        for days in [0, -3, 100_000] {
            let err = tracker
                .weight_projection(&alice(), None, Some(days), day(0))
                .await
                .unwrap_err();
            assert!(matches!(err, AnalyticsError::InvalidInput(_)));
        }
    }

    #[tokio::test]
    async fn test_summary_not_found_when_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = tracker(&dir).await;
        assert!(matches!(
            tracker.weight_summary(&alice(), None, None, day(40)).await,
            Err(AnalyticsError::NotFound(_))
        ));

        record(&mut tracker, 20, 80.0).await;
        record(&mut tracker, 30, 79.0).await;
        let summary = tracker.weight_summary(&alice(), None, None, day(40)).await.unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.period.from_date, day(10));
        assert_eq!(summary.change, -1.0);
    }

    #[tokio::test]
    async fn test_list_goals_active_only() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = tracker(&dir).await;
        let first = tracker
            .create_goal(&alice(), draft(75.0, 10, Some(80.0)), day(0))
            .await
            .unwrap();
        tracker.create_goal(&alice(), draft(70.0, 20, Some(80.0)), day(0)).await.unwrap();
        tracker
            .update_goal(
                &alice(),
                first.id,
                GoalUpdate { is_achieved: Some(true), ..Default::default() },
                day(3),
            )
            .await
            .unwrap();

        assert_eq!(tracker.list_goals(&alice(), false, day(3)).await.unwrap().len(), 2);
        let active = tracker.list_goals(&alice(), true, day(3)).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].days_remaining, 17);
    }

    #[tokio::test]
    async fn test_custom_config_windows() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnalyticsConfig {
            default_horizon_days: 3,
            max_horizon_days: 10,
            recent_window_days: 2,
            summary_window_days: 5,
            ..Default::default()
        };
        let mut tracker = tracker(&dir).await.with_config(config);
        tracker.create_goal(&alice(), draft(70.0, 40, Some(80.0)), day(0)).await.unwrap();
        record(&mut tracker, 6, 79.0).await;
        record(&mut tracker, 9, 78.0).await;
        record(&mut tracker, 10, 77.5).await;

        let stored = tracker.storage().find_observations(&alice(), day(0), day(10)).await.unwrap();
        assert_eq!(stored.len(), 3);

        // Only days 8 through 10 feed the rate
        let report = tracker.weight_projection(&alice(), None, None, day(10)).await.unwrap();
        assert_eq!(report.avg_change_per_day, -0.5);
        assert_eq!(report.weight_projections.len(), 3);
        assert_eq!(report.projected_completion_date, Some(day(25)));

        let err = tracker
            .weight_projection(&alice(), None, Some(11), day(10))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidInput(_)));

        let summary = tracker.weight_summary(&alice(), None, None, day(10)).await.unwrap();
        assert_eq!(summary.period.from_date, day(5));
        assert_eq!(summary.count, 3);
    }
}
