//! Runtime configuration, from flags or `WEIGHTWISE_*` environment variables.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime};
use clap::{Args, ValueEnum};
use weightwise_core::{parse_date, parse_time, parse_weight, UserId};
use weightwise_sync::client::DEFAULT_BASE_URL;

/// Storage backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// One JSON file per record
    Json,
    /// SQLite database (requires the `sqlite` feature)
    Sqlite,
}

#[derive(Debug, Clone, Args)]
pub struct Config {
    /// Directory holding weight data
    #[arg(long, global = true, env = "WEIGHTWISE_DATA_DIR", default_value = ".weightwise")]
    pub data_dir: PathBuf,

    /// Storage backend
    #[arg(long, global = true, env = "WEIGHTWISE_BACKEND", value_enum, default_value = "json")]
    pub backend: Backend,

    /// User whose data is read and written
    #[arg(long, global = true, env = "WEIGHTWISE_USER", default_value = "default_user")]
    pub user: String,

    /// Fitness API root
    #[arg(long, global = true, env = "WEIGHTWISE_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub api_base_url: String,

    /// Bearer token for the fitness API
    #[arg(long, global = true, env = "WEIGHTWISE_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Evaluate as of this date instead of today (YYYY-MM-DD)
    #[arg(long, global = true, env = "WEIGHTWISE_TODAY", value_parser = date_arg)]
    pub today: Option<NaiveDate>,
}

impl Config {
    pub fn user_id(&self) -> UserId {
        UserId::new(self.user.clone())
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    pub fn sqlite_path(&self) -> PathBuf {
        self.data_dir.join("weightwise.db")
    }
}

pub fn date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).map_err(|e| e.to_string())
}

pub fn weight_arg(s: &str) -> Result<f64, String> {
    parse_weight(s).map_err(|e| e.to_string())
}

pub fn time_arg(s: &str) -> Result<NaiveTime, String> {
    parse_time(s).map_err(|e| e.to_string())
}
