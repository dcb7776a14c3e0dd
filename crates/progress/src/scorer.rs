//! Goal completion percentage.

use weightwise_core::Goal;

/// How far the user has come from the start weight toward the target, in
/// percent, clamped to `[0, 100]`.
///
/// Achieved goals score 100 and a missing latest weight scores 0. Moving away
/// from the target or overshooting it computes outside the range before the
/// clamp. Anything that cannot be computed scores 0.
pub fn progress_percentage(goal: &Goal, latest_weight: Option<f64>) -> f64 {
    if goal.is_achieved {
        return 100.0;
    }
    let Some(latest_weight) = latest_weight else {
        return 0.0;
    };

    let total_diff = (goal.start_weight - goal.target_weight).abs();
    if total_diff == 0.0 {
        return 100.0;
    }

    let current_diff = (latest_weight - goal.target_weight).abs();
    let progress = (total_diff - current_diff) / total_diff * 100.0;
    if !progress.is_finite() {
        return 0.0;
    }
    progress.clamp(0.0, 100.0)
}
