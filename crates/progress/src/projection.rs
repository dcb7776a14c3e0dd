//! Weight forecasting and completion-date estimation.

use chrono::{Days, NaiveDate};
use weightwise_core::{Goal, GoalDirection, Observation, WeightProjection};

use crate::estimator::average_daily_change;
use crate::round_to_tenth;

/// Result of [`project`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionOutcome {
    /// Daily rate the forecast was built with
    pub avg_change_per_day: f64,
    /// Estimated date the target weight is reached
    pub projected_completion_date: Option<NaiveDate>,
    /// Forecast for each of the following `horizon_days` days
    pub weight_projections: Vec<WeightProjection>,
    /// True when fewer than two recent observations were available
    pub insufficient_data: bool,
}

/// Forecast the next `horizon_days` days of weight for a goal.
///
/// With at least two `recent` observations (ascending by date) the forecast
/// follows their average rate, and a completion date is estimated only when
/// that rate moves toward the target. Otherwise the forecast follows the
/// straight line from `latest_weight` to the target and reports the goal's
/// own target date.
pub fn project(
    goal: &Goal,
    recent: &[Observation],
    latest_weight: f64,
    horizon_days: u32,
    today: NaiveDate,
) -> ProjectionOutcome {
    if recent.len() < 2 {
        let rate = fallback_rate(goal, latest_weight, today);
        return ProjectionOutcome {
            avg_change_per_day: rate,
            projected_completion_date: Some(goal.target_date),
            weight_projections: project_weights(latest_weight, rate, horizon_days, today),
            insufficient_data: true,
        };
    }

    let rate = average_daily_change(recent);
    ProjectionOutcome {
        avg_change_per_day: rate,
        projected_completion_date: completion_date(goal, latest_weight, rate, today),
        weight_projections: project_weights(latest_weight, rate, horizon_days, today),
        insufficient_data: false,
    }
}

/// Straight-line rate from `latest_weight` to the target by the target date.
/// 0 once the target date is today or past.
fn fallback_rate(goal: &Goal, latest_weight: f64, today: NaiveDate) -> f64 {
    let days_left = (goal.target_date - today).num_days();
    if days_left <= 0 {
        return 0.0;
    }
    (goal.target_weight - latest_weight) / days_left as f64
}

/// Accumulate `rate` onto a running weight for each day after `today`.
fn project_weights(
    latest_weight: f64,
    rate: f64,
    horizon_days: u32,
    today: NaiveDate,
) -> Vec<WeightProjection> {
    let mut weight = latest_weight;
    (1..=u64::from(horizon_days))
        .map_while(|offset| today.checked_add_days(Days::new(offset)))
        .map(|date| {
            weight += rate;
            WeightProjection { date, projected_weight: round_to_tenth(weight) }
        })
        .collect()
}

/// Whole days to the target at `rate`, half-day ties rounding to even.
fn completion_date(
    goal: &Goal,
    latest_weight: f64,
    rate: f64,
    today: NaiveDate,
) -> Option<NaiveDate> {
    let toward_target = match goal.direction() {
        GoalDirection::Gain => rate > 0.0,
        GoalDirection::Lose => rate < 0.0,
        GoalDirection::Maintain => false,
    };
    if !toward_target || rate == 0.0 {
        return None;
    }

    let days_to_goal = ((goal.target_weight - latest_weight) / rate).abs().round_ties_even();
    if !days_to_goal.is_finite() {
        return None;
    }
    today.checked_add_days(Days::new(days_to_goal as u64))
}
