//! Bearer token supply for the fitness API.

use async_trait::async_trait;
use weightwise_core::UserId;

use crate::error::Result;

/// Supplies a currently valid bearer token for a user.
///
/// Implementations own expiry and refresh; `Ok(None)` means the user is not
/// connected.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// A valid access token for `user_id`.
    async fn access_token(&self, user_id: &UserId) -> Result<Option<String>>;
}

/// A fixed token taken from configuration, shared by every user.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenProvider {
    token: Option<String>,
}

impl StaticTokenProvider {
    /// Create a provider. Blank tokens count as missing.
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self, _user_id: &UserId) -> Result<Option<String>> {
        Ok(self.token.clone())
    }
}
