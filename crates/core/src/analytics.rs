//! Derived analytics records. Computed per request and never persisted.

use serde::{Deserialize, Serialize};

use crate::goal::Goal;
use crate::Date;

/// Actual versus ideal weight on one day of a goal window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyDiff {
    /// Day
    pub date: Date,
    /// Ideal weight for this day, rounded to 0.1
    pub target_weight: f64,
    /// Recorded weight, if any observation exists for the day
    pub actual_weight: Option<f64>,
    /// `actual - target`, rounded to 0.1
    pub difference: Option<f64>,
}

/// A forecast weight on a future day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightProjection {
    /// Day
    pub date: Date,
    /// Forecast weight, rounded to 0.1
    pub projected_weight: f64,
}

/// A goal as presented to callers, with its derived fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalView {
    /// The stored goal
    #[serde(flatten)]
    pub goal: Goal,
    /// Days until the target date, negative once overdue
    pub days_remaining: i64,
    /// Completion progress in [0, 100]
    pub progress_percentage: f64,
}

/// Actual-versus-ideal comparison for a goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryReport {
    /// Goal being tracked
    pub goal: GoalView,
    /// Most recent recorded weight
    pub current_weight: Option<f64>,
    /// `current_weight - target_weight`, rounded to 0.1
    pub weight_to_lose: Option<f64>,
    /// Days until the target date
    pub days_remaining: i64,
    /// One entry per day from the start date to today or the target date
    pub daily_weight_diffs: Vec<DailyDiff>,
    /// Average daily change over the goal window so far
    pub avg_actual_change_per_day: Option<f64>,
}

/// Forecast of future weights for a goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionReport {
    /// Goal being tracked
    pub goal: GoalView,
    /// Weight the forecast starts from
    pub latest_weight: f64,
    /// Daily rate used for the forecast
    pub avg_change_per_day: f64,
    /// Estimated date the target is reached
    pub projected_completion_date: Option<Date>,
    /// One entry per forecast day
    pub weight_projections: Vec<WeightProjection>,
    /// True when the fallback ideal rate was used
    pub insufficient_data: bool,
}

/// Date range a summary was computed over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryPeriod {
    /// First day, inclusive
    pub from_date: Date,
    /// Last day, inclusive
    pub to_date: Date,
}

/// One point of a weight chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Day
    pub date: Date,
    /// Recorded weight
    pub weight: f64,
}

/// Descriptive statistics over a period of observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightSummary {
    /// Number of observations
    pub count: usize,
    /// Lowest weight
    pub min_weight: f64,
    /// Highest weight
    pub max_weight: f64,
    /// Mean weight
    pub avg_weight: f64,
    /// First weight in the period
    pub start_weight: f64,
    /// Last weight in the period
    pub end_weight: f64,
    /// `end_weight - start_weight`, 0 with a single observation
    pub change: f64,
    /// Period covered
    pub period: SummaryPeriod,
    /// Raw series for plotting
    pub chart_data: Vec<ChartPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UserId;
    use chrono::NaiveDate;

    fn date(month: u32, day: u32) -> Date {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    fn sample_view() -> GoalView {
        let goal = Goal::new(UserId::new("u"), 70.0, date(3, 1), 80.0, date(1, 1));
        GoalView { goal, days_remaining: 5, progress_percentage: 50.0 }
    }

    fn keys(json: &serde_json::Value) -> Vec<&str> {
        let mut keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    #[test]
    fn test_goal_view_flattens_goal_fields() {
        let json = serde_json::to_value(sample_view()).unwrap();

        assert_eq!(json["target_weight"], 70.0);
        assert_eq!(json["target_date"], "2024-03-01");
        assert_eq!(json["days_remaining"], 5);
        assert_eq!(json["progress_percentage"], 50.0);
        assert!(json.get("goal").is_none());
    }

    #[test]
    fn test_daily_diff_serializes_missing_values_as_null() {
        let diff = DailyDiff {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            target_weight: 79.8,
            actual_weight: None,
            difference: None,
        };
        let json = serde_json::to_value(&diff).unwrap();
        assert!(json["actual_weight"].is_null());
        assert!(json["difference"].is_null());
    }

    #[test]
    fn test_trajectory_report_field_names() {
        let report = TrajectoryReport {
            goal: sample_view(),
            current_weight: Some(78.4),
            weight_to_lose: Some(8.4),
            days_remaining: 16,
            daily_weight_diffs: vec![DailyDiff {
                date: date(1, 1),
                target_weight: 80.0,
                actual_weight: Some(80.0),
                difference: Some(0.0),
            }],
            avg_actual_change_per_day: Some(-0.4),
        };
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(
            keys(&json),
            vec![
                "avg_actual_change_per_day",
                "current_weight",
                "daily_weight_diffs",
                "days_remaining",
                "goal",
                "weight_to_lose",
            ]
        );
        assert_eq!(json["goal"]["target_weight"], 70.0);
        assert_eq!(json["goal"]["progress_percentage"], 50.0);
        assert_eq!(
            keys(&json["daily_weight_diffs"][0]),
            vec!["actual_weight", "date", "difference", "target_weight"]
        );
        assert_eq!(json["daily_weight_diffs"][0]["date"], "2024-01-01");
    }

    #[test]
    fn test_projection_report_field_names() {
        let mut report = ProjectionReport {
            goal: sample_view(),
            latest_weight: 77.0,
            avg_change_per_day: -0.5,
            projected_completion_date: Some(date(1, 22)),
            weight_projections: vec![WeightProjection { date: date(1, 9), projected_weight: 76.5 }],
            insufficient_data: false,
        };
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(
            keys(&json),
            vec![
                "avg_change_per_day",
                "goal",
                "insufficient_data",
                "latest_weight",
                "projected_completion_date",
                "weight_projections",
            ]
        );
        assert_eq!(json["projected_completion_date"], "2024-01-22");
        assert_eq!(json["insufficient_data"], false);
        assert_eq!(json["weight_projections"][0]["date"], "2024-01-09");
        assert_eq!(json["weight_projections"][0]["projected_weight"], 76.5);

        report.projected_completion_date = None;
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["projected_completion_date"].is_null());
    }
}
