//! Upstream weight log import.
//!
//! Fetches weight logs from the fitness API and stores them as observations,
//! skipping logs that were imported before.

#![warn(missing_docs)]

pub mod client;
pub mod entry;
pub mod error;
pub mod import;
pub mod token;

pub use client::WeightLogClient;
pub use entry::{LogId, WeightLogEntry, WeightLogResponse};
pub use error::{Result, SyncError};
pub use import::{import_entries, sync_weight_logs, ImportReport};
pub use token::{StaticTokenProvider, TokenProvider};
