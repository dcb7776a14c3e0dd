//! HTTP client for the weight log endpoint.

use chrono::NaiveDate;
use reqwest::StatusCode;
use tracing::debug;

use crate::entry::{WeightLogEntry, WeightLogResponse};
use crate::error::{Result, SyncError};

/// Default upstream API root.
pub const DEFAULT_BASE_URL: &str = "https://api.fitbit.com";

/// Reads weight logs from the fitness API.
#[derive(Debug, Clone)]
pub struct WeightLogClient {
    http: reqwest::Client,
    base_url: String,
}

impl WeightLogClient {
    /// Create a client for the API rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// URL of the weight log range endpoint.
    pub fn weight_log_url(&self, from: NaiveDate, to: NaiveDate) -> String {
        format!(
            "{}/1/user/-/body/log/weight/date/{}/{}.json",
            self.base_url,
            from.format("%Y-%m-%d"),
            to.format("%Y-%m-%d")
        )
    }

    /// Fetch the weight logs dated within `[from, to]`.
    pub async fn fetch(
        &self,
        access_token: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<WeightLogEntry>> {
        let url = self.weight_log_url(from, to);
        debug!("Fetching weight logs from {}", url);

        let response = self.http.get(&url).bearer_auth(access_token).send().await?;
        let status = response.status();
        if status.is_success() {
            let body: WeightLogResponse = response.json().await?;
            return Ok(body.weight);
        }

        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, &body))
    }
}

impl Default for WeightLogClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Map an unsuccessful response to a [`SyncError`].
fn status_error(status: StatusCode, body: &str) -> SyncError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => SyncError::RateLimited,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            SyncError::Unauthorized(status.as_u16())
        }
        _ => SyncError::Api {
            status: status.as_u16(),
            message: upstream_message(body).unwrap_or_else(|| status.to_string()),
        },
    }
}

/// First message from an `{"errors": [{"message": ...}]}` body.
fn upstream_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("errors")?
        .get(0)?
        .get("message")?
        .as_str()
        .map(str::to_string)
}
