//! Ideal trajectory and daily actual-versus-ideal deltas.

use std::collections::HashMap;

use chrono::NaiveDate;
use weightwise_core::{DailyDiff, Goal, GoalView, Observation, TrajectoryReport};

use crate::estimator::average_daily_change;
use crate::round_to_tenth;

/// Daily weight change that takes the goal from start to target linearly.
///
/// A goal whose target date is not after its start date has rate 0.
pub fn ideal_daily_rate(goal: &Goal) -> f64 {
    if goal.target_date <= goal.start_date {
        return 0.0;
    }
    let total_days = (goal.target_date - goal.start_date).num_days();
    (goal.target_weight - goal.start_weight) / total_days as f64
}

/// Last day the trajectory walk covers: today, or the target date if earlier.
pub fn trajectory_end(goal: &Goal, today: NaiveDate) -> NaiveDate {
    today.min(goal.target_date)
}

/// One [`DailyDiff`] for every calendar day from the start date through
/// [`trajectory_end`], whether or not an observation exists that day.
///
/// When several observations share a date, the first in input order is used.
pub fn daily_diffs(goal: &Goal, observations: &[Observation], today: NaiveDate) -> Vec<DailyDiff> {
    let rate = ideal_daily_rate(goal);
    let end = trajectory_end(goal, today);

    let mut by_date: HashMap<NaiveDate, f64> = HashMap::new();
    for observation in observations {
        by_date.entry(observation.date).or_insert(observation.weight);
    }

    let mut diffs = Vec::new();
    let mut current = goal.start_date;
    while current <= end {
        let days_since_start = (current - goal.start_date).num_days();
        let target_weight = goal.start_weight + rate * days_since_start as f64;
        let actual_weight = by_date.get(&current).copied();

        diffs.push(DailyDiff {
            date: current,
            target_weight: round_to_tenth(target_weight),
            actual_weight,
            difference: actual_weight.map(|actual| round_to_tenth(actual - target_weight)),
        });

        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }
    diffs
}

/// Assemble the trajectory envelope for a goal.
///
/// `observations` is the user's history within `[start_date, today]`, in
/// ascending date order; `current_weight` the user's most recent weight.
pub fn trajectory_report(
    goal: GoalView,
    observations: &[Observation],
    current_weight: Option<f64>,
    today: NaiveDate,
) -> TrajectoryReport {
    let daily_weight_diffs = daily_diffs(&goal.goal, observations, today);
    let avg_actual_change_per_day =
        (!observations.is_empty()).then(|| average_daily_change(observations));

    TrajectoryReport {
        current_weight,
        weight_to_lose: current_weight.map(|w| round_to_tenth(w - goal.goal.target_weight)),
        days_remaining: goal.goal.days_remaining(today),
        daily_weight_diffs,
        avg_actual_change_per_day,
        goal,
    }
}
