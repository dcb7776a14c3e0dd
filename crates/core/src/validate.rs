//! Parsing and validation of user-supplied values.

use chrono::{NaiveDate, NaiveTime};

/// Rejected input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Date not in `YYYY-MM-DD` form
    #[error("Invalid date format '{0}'. Use YYYY-MM-DD")]
    Date(String),

    /// Time not in `HH:MM:SS` form
    #[error("Invalid time format '{0}'. Use HH:MM:SS")]
    Time(String),

    /// Weight not a number
    #[error("Invalid weight '{0}'")]
    Weight(String),

    /// Weight zero, negative or not finite
    #[error("Weight must be a positive number, got {0}")]
    NonPositiveWeight(f64),
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::Date(s.to_string()))
}

/// Parse an `HH:MM:SS` time of day.
pub fn parse_time(s: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M:%S")
        .map_err(|_| ValidationError::Time(s.to_string()))
}

/// Parse a weight and check it is positive.
pub fn parse_weight(s: &str) -> Result<f64, ValidationError> {
    let weight: f64 = s
        .trim()
        .parse()
        .map_err(|_| ValidationError::Weight(s.to_string()))?;
    check_weight(weight)
}

/// Check a weight is a positive finite number.
pub fn check_weight(weight: f64) -> Result<f64, ValidationError> {
    if weight.is_finite() && weight > 0.0 {
        Ok(weight)
    } else {
        Err(ValidationError::NonPositiveWeight(weight))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(parse_date("2024/02/29"), Err(ValidationError::Date("2024/02/29".to_string())));
        assert!(parse_date("2023-02-29").is_err());
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("07:15:00").unwrap(), NaiveTime::from_hms_opt(7, 15, 0).unwrap());
        assert!(parse_time("7am").is_err());
    }

    #[test]
    fn test_parse_weight() {
        assert_eq!(parse_weight(" 72.4 ").unwrap(), 72.4);
        assert!(matches!(parse_weight("heavy"), Err(ValidationError::Weight(_))));
        assert!(matches!(parse_weight("0"), Err(ValidationError::NonPositiveWeight(_))));
        assert!(matches!(parse_weight("-3"), Err(ValidationError::NonPositiveWeight(_))));
        assert!(check_weight(f64::NAN).is_err());
    }
}
