//! Goal model - a target weight to reach by a target date.

use serde::{Deserialize, Serialize};

use crate::id::{GoalId, UserId};
use crate::{Date, Time};

/// A weight goal anchored to a start weight and date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// Unique identifier
    pub id: GoalId,

    /// Owning user
    pub user_id: UserId,

    /// Weight to reach
    pub target_weight: f64,

    /// Date the target should be reached by
    pub target_date: Date,

    /// Weight when the goal was set
    pub start_weight: f64,

    /// Date the goal was set
    pub start_date: Date,

    /// Free-form note
    pub description: Option<String>,

    /// Whether the user marked the goal as reached
    pub is_achieved: bool,

    /// Date of the transition to achieved
    pub achieved_date: Option<Date>,

    /// When created
    pub created_at: Time,

    /// Last updated
    pub updated_at: Time,
}

/// Which way the weight has to move to reach a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalDirection {
    /// Target is below the start weight
    Lose,
    /// Target is above the start weight
    Gain,
    /// Start and target are equal
    Maintain,
}

/// Input for creating a goal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalDraft {
    /// Weight to reach
    pub target_weight: f64,
    /// Date to reach it by
    pub target_date: Date,
    /// Start weight used only when the user has no observations yet
    pub start_weight: Option<f64>,
    /// Free-form note
    pub description: Option<String>,
}

/// Partial update of a goal. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalUpdate {
    /// New target weight
    pub target_weight: Option<f64>,
    /// New target date
    pub target_date: Option<Date>,
    /// New description
    pub description: Option<String>,
    /// New achieved flag
    pub is_achieved: Option<bool>,
}

impl Goal {
    /// Create a goal starting at `start_weight` on `start_date`.
    pub fn new(
        user_id: UserId,
        target_weight: f64,
        target_date: Date,
        start_weight: f64,
        start_date: Date,
    ) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: GoalId::new(),
            user_id,
            target_weight,
            target_date,
            start_weight,
            start_date,
            description: None,
            is_achieved: false,
            achieved_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Attach a description.
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Direction the weight has to move, from start to target.
    pub fn direction(&self) -> GoalDirection {
        if self.target_weight < self.start_weight {
            GoalDirection::Lose
        } else if self.target_weight > self.start_weight {
            GoalDirection::Gain
        } else {
            GoalDirection::Maintain
        }
    }

    /// Days left until the target date. Negative once overdue.
    pub fn days_remaining(&self, today: Date) -> i64 {
        (self.target_date - today).num_days()
    }

    /// Set the achieved flag.
    ///
    /// `achieved_date` is stamped with `today` on the first transition to
    /// achieved and cleared when the flag goes back to false.
    pub fn set_achieved(&mut self, achieved: bool, today: Date) {
        self.is_achieved = achieved;
        if achieved {
            if self.achieved_date.is_none() {
                self.achieved_date = Some(today);
            }
        } else {
            self.achieved_date = None;
        }
    }

    /// Apply a partial update and bump `updated_at`.
    pub fn apply(&mut self, update: GoalUpdate, today: Date) {
        if let Some(weight) = update.target_weight {
            self.target_weight = weight;
        }
        if let Some(date) = update.target_date {
            self.target_date = date;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(achieved) = update.is_achieved {
            self.set_achieved(achieved, today);
        }
        self.updated_at = chrono::Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> Date {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn goal() -> Goal {
        Goal::new(UserId::new("u"), 70.0, date(2024, 3, 1), 80.0, date(2024, 1, 1))
    }

    #[test]
    fn test_direction() {
        let mut g = goal();
        assert_eq!(g.direction(), GoalDirection::Lose);
        g.target_weight = 85.0;
        assert_eq!(g.direction(), GoalDirection::Gain);
        g.target_weight = 80.0;
        assert_eq!(g.direction(), GoalDirection::Maintain);
    }

    #[test]
    fn test_days_remaining_goes_negative_when_overdue() {
        let g = goal();
        assert_eq!(g.days_remaining(date(2024, 2, 20)), 10);
        assert_eq!(g.days_remaining(date(2024, 3, 11)), -10);
    }

    #[test]
    fn test_achieved_date_stamped_once() {
        let mut g = goal();
        g.set_achieved(true, date(2024, 2, 1));
        g.set_achieved(true, date(2024, 2, 5));
        assert_eq!(g.achieved_date, Some(date(2024, 2, 1)));
    }

    #[test]
    fn test_achieved_date_cleared_when_unachieved() {
        let mut g = goal();
        g.set_achieved(true, date(2024, 2, 1));
        g.set_achieved(false, date(2024, 2, 2));
        assert!(!g.is_achieved);
        assert!(g.achieved_date.is_none());
    }

    #[test]
    fn test_apply_partial_update() {
        let mut g = goal();
        g.apply(
            GoalUpdate {
                target_weight: Some(72.5),
                description: Some("summer".to_string()),
                ..Default::default()
            },
            date(2024, 1, 10),
        );
        assert_eq!(g.target_weight, 72.5);
        assert_eq!(g.target_date, date(2024, 3, 1));
        assert_eq!(g.description.as_deref(), Some("summer"));
        assert!(!g.is_achieved);
    }
}
