//! Average rate of weight change.

use weightwise_core::Observation;

/// Average daily weight change between the first and last observation.
///
/// The endpoints are taken positionally, so callers must pass observations in
/// ascending date order. Fewer than two observations, or endpoints on the
/// same day, yield 0.
pub fn average_daily_change(observations: &[Observation]) -> f64 {
    let [first, .., last] = observations else {
        return 0.0;
    };

    let days = (last.date - first.date).num_days();
    if days == 0 {
        return 0.0;
    }

    (last.weight - first.weight) / days as f64
}
