//! Conversion of weight logs into stored observations.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};
use weightwise_core::{check_weight, parse_date, parse_time, NewObservation, Observation, UserId};
use weightwise_storage::Storage;

use crate::client::WeightLogClient;
use crate::entry::WeightLogEntry;
use crate::error::{Result, SyncError};
use crate::token::TokenProvider;

/// Outcome of an import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Entries handed to the import
    pub received: usize,
    /// New observations written
    pub inserted: usize,
    /// Entries whose log id was already stored
    pub duplicates: usize,
    /// Entries with an unusable date or weight
    pub rejected: usize,
}

/// Store `entries` as observations for `user_id`.
///
/// The log id becomes the external id, so re-importing the same range is a
/// no-op. An unparseable time is dropped; an unparseable date or a
/// non-positive weight rejects the entry.
pub async fn import_entries<S: Storage>(
    storage: &mut S,
    user_id: &UserId,
    entries: &[WeightLogEntry],
) -> Result<ImportReport> {
    let mut report = ImportReport {
        received: entries.len(),
        ..Default::default()
    };

    for entry in entries {
        let Some(fields) = to_observation(entry) else {
            report.rejected += 1;
            continue;
        };

        let observation = Observation::new(user_id.clone(), fields);
        if storage.save_observation(&observation).await? {
            report.inserted += 1;
        } else {
            report.duplicates += 1;
        }
    }

    info!(
        "Imported weight logs for {}: {} new, {} already stored, {} rejected",
        user_id, report.inserted, report.duplicates, report.rejected
    );
    Ok(report)
}

/// Fetch logs dated within `[from, to]` and import them.
pub async fn sync_weight_logs<S: Storage>(
    client: &WeightLogClient,
    tokens: &dyn TokenProvider,
    storage: &mut S,
    user_id: &UserId,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<ImportReport> {
    let token = tokens
        .access_token(user_id)
        .await?
        .ok_or(SyncError::NotAuthenticated)?;

    let entries = client.fetch(&token, from, to).await?;
    import_entries(storage, user_id, &entries).await
}

fn to_observation(entry: &WeightLogEntry) -> Option<NewObservation> {
    let date = match parse_date(&entry.date) {
        Ok(date) => date,
        Err(e) => {
            warn!("Skipping weight log {}: {}", entry.log_id, e);
            return None;
        }
    };
    let weight = match check_weight(entry.weight) {
        Ok(weight) => weight,
        Err(e) => {
            warn!("Skipping weight log {}: {}", entry.log_id, e);
            return None;
        }
    };
    let time = entry.time.as_deref().and_then(|t| parse_time(t).ok());

    Some(NewObservation {
        date,
        weight,
        bmi: entry.bmi,
        time,
        source: entry.source.clone(),
        external_id: Some(entry.log_id.to_string()),
    })
}
