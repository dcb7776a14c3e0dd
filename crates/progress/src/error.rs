//! Analytics errors.

use weightwise_core::ValidationError;
use weightwise_storage::StorageError;

/// Result type for analytics operations.
pub type Result<T> = std::result::Result<T, AnalyticsError>;

/// Errors surfaced by [`crate::WeightTracker`].
///
/// Degenerate arithmetic (empty windows, zero rates) is never an error; the
/// engines substitute their documented fallbacks instead.
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    /// No goal or data matches the request
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request rejected before any computation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Storage failure
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<ValidationError> for AnalyticsError {
    fn from(e: ValidationError) -> Self {
        AnalyticsError::InvalidInput(e.to_string())
    }
}
