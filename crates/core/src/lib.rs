//! Weightwise core data models.
//!
//! This crate defines the records the rest of the workspace passes around:
//! weight observations, weight goals, and the derived analytics envelopes.

#![warn(missing_docs)]

// Core identities
mod id;

// Stored records
mod observation;
mod goal;

// Derived, never persisted
mod analytics;

// Input validation
mod validate;

// Re-exports
pub use id::*;

pub use observation::{Observation, NewObservation};
pub use goal::{Goal, GoalDraft, GoalUpdate, GoalDirection};
pub use analytics::{
    DailyDiff, WeightProjection, GoalView, TrajectoryReport, ProjectionReport,
    WeightSummary, ChartPoint, SummaryPeriod,
};
pub use validate::{ValidationError, parse_date, parse_time, parse_weight, check_weight};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;

/// Calendar date type used for observations and goals.
pub type Date = chrono::NaiveDate;
