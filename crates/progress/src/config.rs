//! Analytics tuning and bounds.

/// Windows and limits applied by [`crate::WeightTracker`].
#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    /// Forecast length when the caller gives none
    pub default_horizon_days: i64,
    /// Longest forecast a caller may request
    pub max_horizon_days: i64,
    /// Days of history feeding the projection rate
    pub recent_window_days: u64,
    /// Summary period when the caller gives no start date
    pub summary_window_days: u64,
    /// Longest goal window the trajectory walk will cover
    pub max_trajectory_days: i64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            default_horizon_days: 30,
            max_horizon_days: 3650,
            recent_window_days: 7,
            summary_window_days: 30,
            max_trajectory_days: 3660,
        }
    }
}
