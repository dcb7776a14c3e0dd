//! Goal progress analytics.
//!
//! Pure engines for rate estimation, ideal trajectories, projections and
//! progress scoring, plus [`WeightTracker`], the service that feeds them from
//! a [`weightwise_storage::Storage`] backend.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod estimator;
pub mod projection;
pub mod scorer;
pub mod summary;
pub mod trajectory;
pub mod tracker;

pub use config::AnalyticsConfig;
pub use error::{AnalyticsError, Result};
pub use estimator::average_daily_change;
pub use projection::{project, ProjectionOutcome};
pub use scorer::progress_percentage;
pub use summary::summarize;
pub use trajectory::{daily_diffs, ideal_daily_rate, trajectory_report};
pub use tracker::WeightTracker;

/// Round to one decimal place.
///
/// Rounds the exact binary value, with exact ties going to the even digit,
/// so `0.25` becomes `0.2` and `0.75` becomes `0.8`.
pub fn round_to_tenth(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}
