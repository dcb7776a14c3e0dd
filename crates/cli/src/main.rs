//! Weightwise CLI - weight goals and progress analytics.

mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;
use weightwise_core::{GoalDraft, GoalId, GoalUpdate, GoalView, NewObservation};
use weightwise_progress::WeightTracker;
use weightwise_storage::{JsonStorage, Storage};
use weightwise_sync::{
    import_entries, sync_weight_logs, StaticTokenProvider, WeightLogClient, WeightLogResponse,
};

use config::{date_arg, time_arg, weight_arg, Backend, Config};

/// Days covered by list and sync commands without explicit dates.
const DEFAULT_RANGE_DAYS: u64 = 30;

#[derive(Parser)]
#[command(name = "weightwise")]
#[command(about = "Weight goals and progress analytics", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage weight goals
    Goal {
        #[command(subcommand)]
        command: GoalCommand,
    },
    /// Record and list weight measurements
    Weight {
        #[command(subcommand)]
        command: WeightCommand,
    },
    /// Import a weight log JSON export
    Import {
        /// File containing {"weight": [...]}
        file: PathBuf,
    },
    /// Fetch weight logs from the fitness API
    Sync {
        /// First day (default: 30 days ago)
        #[arg(long, value_parser = date_arg)]
        from: Option<NaiveDate>,
        /// Last day (default: today)
        #[arg(long, value_parser = date_arg)]
        to: Option<NaiveDate>,
    },
    /// Compare actual weights with the ideal trajectory
    Diff {
        /// Goal ID (default: the active goal)
        #[arg(long)]
        goal: Option<GoalId>,
    },
    /// Forecast future weights
    Project {
        /// Goal ID (default: the active goal)
        #[arg(long)]
        goal: Option<GoalId>,
        /// Days to forecast (default: 30)
        #[arg(long, allow_negative_numbers = true)]
        days: Option<i64>,
    },
    /// Weight statistics for a period
    Summary {
        /// First day (default: 30 days ago)
        #[arg(long, value_parser = date_arg)]
        from: Option<NaiveDate>,
        /// Last day (default: today)
        #[arg(long, value_parser = date_arg)]
        to: Option<NaiveDate>,
    },
}

#[derive(Subcommand)]
enum GoalCommand {
    /// Set a new goal starting today
    Add {
        /// Weight to reach
        #[arg(long, value_parser = weight_arg)]
        target_weight: f64,
        /// Date to reach it by (YYYY-MM-DD)
        #[arg(long, value_parser = date_arg)]
        target_date: NaiveDate,
        /// Start weight, used only when no measurement exists yet
        #[arg(long, value_parser = weight_arg)]
        start_weight: Option<f64>,
        /// Note
        #[arg(long)]
        description: Option<String>,
    },
    /// List goals
    List {
        /// Only goals not yet achieved
        #[arg(long)]
        active_only: bool,
    },
    /// Show a goal
    Show {
        /// Goal ID
        id: GoalId,
    },
    /// Change a goal
    Update {
        /// Goal ID
        id: GoalId,
        #[arg(long, value_parser = weight_arg)]
        target_weight: Option<f64>,
        #[arg(long, value_parser = date_arg)]
        target_date: Option<NaiveDate>,
        #[arg(long)]
        description: Option<String>,
        /// Mark achieved (true) or not achieved (false)
        #[arg(long)]
        achieved: Option<bool>,
    },
    /// Delete a goal
    Delete {
        /// Goal ID
        id: GoalId,
    },
}

#[derive(Subcommand)]
enum WeightCommand {
    /// Record a measurement
    Add {
        /// Weight
        #[arg(value_parser = weight_arg)]
        weight: f64,
        /// Day of the measurement (default: today)
        #[arg(long, value_parser = date_arg)]
        date: Option<NaiveDate>,
        /// Time of day (HH:MM:SS)
        #[arg(long, value_parser = time_arg)]
        time: Option<NaiveTime>,
        #[arg(long)]
        bmi: Option<f64>,
        #[arg(long, default_value = "manual")]
        source: String,
    },
    /// List measurements
    List {
        /// First day (default: 30 days ago)
        #[arg(long, value_parser = date_arg)]
        from: Option<NaiveDate>,
        /// Last day (default: today)
        #[arg(long, value_parser = date_arg)]
        to: Option<NaiveDate>,
    },
}

fn init_logging() {
    // Analytics output goes to stdout; keep logs on stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = cli.config;

    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("creating data directory {}", config.data_dir.display()))?;

    match config.backend {
        Backend::Json => {
            let storage = JsonStorage::new(&config.data_dir).await?;
            run(WeightTracker::new(storage), &config, cli.command).await
        }
        #[cfg(feature = "sqlite")]
        Backend::Sqlite => {
            let storage =
                weightwise_storage::SqliteStorage::new_from_path(&config.sqlite_path()).await?;
            run(WeightTracker::new(storage), &config, cli.command).await
        }
        #[cfg(not(feature = "sqlite"))]
        Backend::Sqlite => {
            anyhow::bail!("SQLite backend not available; rebuild with --features sqlite")
        }
    }
}

async fn run<S: Storage>(
    mut tracker: WeightTracker<S>,
    config: &Config,
    command: Commands,
) -> Result<()> {
    let user = config.user_id();
    let today = config.today();

    match command {
        Commands::Goal { command } => run_goal(&mut tracker, config, command).await?,
        Commands::Weight { command: WeightCommand::Add { weight, date, time, bmi, source } } => {
            let fields = NewObservation {
                date: date.unwrap_or(today),
                weight,
                bmi,
                time,
                source: Some(source),
                external_id: None,
            };
            if let Some(observation) = tracker.record_observation(&user, fields).await? {
                println!("Recorded {} kg on {}", observation.weight, observation.date);
            }
        }
        Commands::Weight { command: WeightCommand::List { from, to } } => {
            let (from, to) = range_or_default(from, to, today);
            let observations = tracker.observations(&user, from, to).await?;
            println!("Measurements ({})", observations.len());
            for o in observations {
                let time = o.time.map(|t| t.to_string()).unwrap_or_default();
                let source = o.source.unwrap_or_default();
                println!("  {} {:>8} | {:>6.1} kg | {}", o.date, time, o.weight, source);
            }
        }
        Commands::Import { file } => {
            let json = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let payload: WeightLogResponse = serde_json::from_str(&json)
                .with_context(|| format!("parsing {}", file.display()))?;
            let report = import_entries(tracker.storage_mut(), &user, &payload.weight).await?;
            print_json(&report)?;
        }
        Commands::Sync { from, to } => {
            let (from, to) = range_or_default(from, to, today);
            let client = WeightLogClient::new(config.api_base_url.clone());
            let tokens = StaticTokenProvider::new(config.access_token.clone());
            info!("Syncing weight logs {} to {}", from, to);
            let report =
                sync_weight_logs(&client, &tokens, tracker.storage_mut(), &user, from, to).await?;
            print_json(&report)?;
        }
        Commands::Diff { goal } => {
            print_json(&tracker.weight_diff(&user, goal, today).await?)?;
        }
        Commands::Project { goal, days } => {
            print_json(&tracker.weight_projection(&user, goal, days, today).await?)?;
        }
        Commands::Summary { from, to } => {
            print_json(&tracker.weight_summary(&user, from, to, today).await?)?;
        }
    }

    Ok(())
}

async fn run_goal<S: Storage>(
    tracker: &mut WeightTracker<S>,
    config: &Config,
    command: GoalCommand,
) -> Result<()> {
    let user = config.user_id();
    let today = config.today();

    match command {
        GoalCommand::Add { target_weight, target_date, start_weight, description } => {
            let draft = GoalDraft { target_weight, target_date, start_weight, description };
            let goal = tracker.create_goal(&user, draft, today).await?;
            println!("Added goal: {} - {} kg by {}", goal.id, goal.target_weight, goal.target_date);
        }
        GoalCommand::List { active_only } => {
            let goals = tracker.list_goals(&user, active_only, today).await?;
            println!("Goals ({})", goals.len());
            for view in goals {
                println!("  {}", format_goal_line(&view));
            }
        }
        GoalCommand::Show { id } => {
            print_json(&tracker.goal_view(&user, id, today).await?)?;
        }
        GoalCommand::Update { id, target_weight, target_date, description, achieved } => {
            let update =
                GoalUpdate { target_weight, target_date, description, is_achieved: achieved };
            let goal = tracker.update_goal(&user, id, update, today).await?;
            println!("Updated goal: {}", goal.id);
        }
        GoalCommand::Delete { id } => {
            tracker.delete_goal(&user, id).await?;
            println!("Goal {} deleted", id);
        }
    }

    Ok(())
}

fn range_or_default(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    today: NaiveDate,
) -> (NaiveDate, NaiveDate) {
    let to = to.unwrap_or(today);
    let from = from.unwrap_or_else(|| {
        today
            .checked_sub_days(Days::new(DEFAULT_RANGE_DAYS))
            .unwrap_or(NaiveDate::MIN)
    });
    (from, to)
}

fn format_goal_line(view: &GoalView) -> String {
    let goal = &view.goal;
    let status = if goal.is_achieved { "ACHIEVED" } else { "ACTIVE" };
    format!(
        "{} | {:<8} | {:.1} -> {:.1} kg by {} | {:>5.1}% | {} days left",
        goal.id,
        status,
        goal.start_weight,
        goal.target_weight,
        goal.target_date,
        view.progress_percentage,
        view.days_remaining,
    )
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_project_with_negative_days() {
        let cli = Cli::try_parse_from(["weightwise", "project", "--days", "-3"]).unwrap();
        assert!(matches!(cli.command, Commands::Project { days: Some(-3), goal: None }));
    }

    #[test]
    fn test_parse_goal_add() {
        let cli = Cli::try_parse_from([
            "weightwise", "goal", "add", "--target-weight", "70", "--target-date", "2024-06-01",
        ])
        .unwrap();
        match cli.command {
            Commands::Goal { command: GoalCommand::Add { target_weight, start_weight, .. } } => {
                assert_eq!(target_weight, 70.0);
                assert!(start_weight.is_none());
            }
            _ => panic!("expected goal add"),
        }
    }

    #[test]
    fn test_parse_weight_add_time() {
        let cli = Cli::try_parse_from(["weightwise", "weight", "add", "79.4", "--time", "06:45:00"])
            .unwrap();
        match cli.command {
            Commands::Weight { command: WeightCommand::Add { time, source, .. } } => {
                assert_eq!(time, NaiveTime::from_hms_opt(6, 45, 0));
                assert_eq!(source, "manual");
            }
            _ => panic!("expected weight add"),
        }

        let err = Cli::try_parse_from(["weightwise", "weight", "add", "79.4", "--time", "6am"])
            .err()
            .unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_parse_rejects_bad_goal_id() {
        assert!(Cli::try_parse_from(["weightwise", "diff", "--goal", "nope"]).is_err());
    }

    #[test]
    fn test_default_range() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let (from, to) = range_or_default(None, None, today);
        assert_eq!(from, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(to, today);
    }
}
