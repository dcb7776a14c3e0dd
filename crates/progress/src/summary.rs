//! Descriptive statistics over a period of observations.

use chrono::NaiveDate;
use weightwise_core::{ChartPoint, Observation, SummaryPeriod, WeightSummary};

/// Summarize `observations` (ascending by date) recorded within `[from, to]`.
///
/// Returns `None` when there is nothing to summarize.
pub fn summarize(
    observations: &[Observation],
    from: NaiveDate,
    to: NaiveDate,
) -> Option<WeightSummary> {
    let (first, last) = (observations.first()?, observations.last()?);

    let count = observations.len();
    let (min_weight, max_weight, total) = observations.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY, 0.0),
        |(min, max, total), o| (min.min(o.weight), max.max(o.weight), total + o.weight),
    );
    let change = if count > 1 { last.weight - first.weight } else { 0.0 };

    Some(WeightSummary {
        count,
        min_weight,
        max_weight,
        avg_weight: total / count as f64,
        start_weight: first.weight,
        end_weight: last.weight,
        change,
        period: SummaryPeriod { from_date: from, to_date: to },
        chart_data: observations
            .iter()
            .map(|o| ChartPoint { date: o.date, weight: o.weight })
            .collect(),
    })
}
