//! Upstream weight log payload.

use serde::{Deserialize, Serialize};

/// Upstream log identifier. The API sends a number; older exports a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LogId {
    /// Numeric id
    Number(u64),
    /// String id
    Text(String),
}

impl std::fmt::Display for LogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogId::Number(n) => write!(f, "{}", n),
            LogId::Text(s) => f.write_str(s),
        }
    }
}

/// One weight log as returned by `body/log/weight/date/{from}/{to}.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightLogEntry {
    /// Upstream id, stored as the observation's external id
    pub log_id: LogId,
    /// Weight
    pub weight: f64,
    /// BMI
    #[serde(default)]
    pub bmi: Option<f64>,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM:SS`
    #[serde(default)]
    pub time: Option<String>,
    /// Device or app name
    #[serde(default)]
    pub source: Option<String>,
}

/// Envelope around the weight log list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeightLogResponse {
    /// Logs in the requested range
    #[serde(default)]
    pub weight: Vec<WeightLogEntry>,
}
