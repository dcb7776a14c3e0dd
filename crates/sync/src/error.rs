//! Sync errors.

use weightwise_storage::StorageError;

/// Result type for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Errors raised while fetching or importing weight logs.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// No usable access token
    #[error("Not authenticated with the fitness API or token refresh failed")]
    NotAuthenticated,

    /// Upstream rejected the token
    #[error("Authentication failed ({0}). Please reauthenticate.")]
    Unauthorized(u16),

    /// Upstream rate limit hit
    #[error("Fitness API rate limit exceeded. Please try again later.")]
    RateLimited,

    /// Any other upstream error response
    #[error("Error fetching weight data ({status}): {message}")]
    Api {
        /// HTTP status
        status: u16,
        /// Upstream message, or the status text
        message: String,
    },

    /// Transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Malformed payload
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Storage failure
    #[error(transparent)]
    Storage(#[from] StorageError),
}
