//! Observation model - one recorded body-weight measurement.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::id::{ObservationId, UserId};
use crate::{Date, Time};

/// A single weight measurement for a user on a date.
///
/// Observations are written once, by import or manual entry, and never
/// updated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Unique identifier
    pub id: ObservationId,

    /// Owning user
    pub user_id: UserId,

    /// Calendar date of the measurement
    pub date: Date,

    /// Body weight in kilograms
    pub weight: f64,

    /// Body mass index, when the source reports one
    pub bmi: Option<f64>,

    /// Time of day of the measurement
    pub time: Option<NaiveTime>,

    /// Device or app that produced the measurement
    pub source: Option<String>,

    /// Upstream log identifier, the dedup key for re-imports
    pub external_id: Option<String>,

    /// When stored
    pub created_at: Time,
}

/// Fields needed to record a new observation.
#[derive(Debug, Clone, Default)]
pub struct NewObservation {
    /// Calendar date of the measurement
    pub date: Date,
    /// Body weight in kilograms
    pub weight: f64,
    /// Body mass index
    pub bmi: Option<f64>,
    /// Time of day
    pub time: Option<NaiveTime>,
    /// Data source
    pub source: Option<String>,
    /// Upstream log identifier
    pub external_id: Option<String>,
}

impl Observation {
    /// Create a new observation for `user_id`.
    pub fn new(user_id: UserId, fields: NewObservation) -> Self {
        Self {
            id: ObservationId::new(),
            user_id,
            date: fields.date,
            weight: fields.weight,
            bmi: fields.bmi,
            time: fields.time,
            source: fields.source,
            external_id: fields.external_id,
            created_at: chrono::Utc::now(),
        }
    }

    /// Ordering key used by range queries: date, then time of day.
    ///
    /// A missing time sorts before any recorded time on the same date.
    pub fn sort_key(&self) -> (Date, Option<NaiveTime>) {
        (self.date, self.time)
    }
}
