use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;

use lumi_mood::{
    settings::{load_config, save_config},
    utils::logging,
    BehaviorSnapshot, Database, MoodDetector,
};

#[derive(Parser)]
#[command(name = "lumi-mood", about = "Classify a user's working mood from task and focus activity")]
struct Cli {
    /// SQLite database holding mood observations
    #[arg(long, global = true, default_value = "lumi-mood.sqlite3")]
    db: PathBuf,
    /// JSON file with engine tunables (defaults when absent)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify the mood described by a behavior snapshot
    Classify {
        /// Behavior snapshot JSON file
        #[arg(long)]
        snapshot: PathBuf,
        /// Ignore any cached result and classify again
        #[arg(long, default_value_t = false)]
        refresh: bool,
    },
    /// Show the assistant personality adapted to the snapshot's mood
    Personality {
        /// Behavior snapshot JSON file
        #[arg(long)]
        snapshot: PathBuf,
    },
    /// Predict near-term mood changes from the snapshot and stored history
    Predict {
        /// Behavior snapshot JSON file
        #[arg(long)]
        snapshot: PathBuf,
    },
    /// Analyze a user's stored mood history
    History {
        #[arg(long)]
        user: String,
        /// Days to look back (clamped to the configured window)
        #[arg(long, default_value_t = 30)]
        days: u32,
    },
    /// Print the effective configuration
    Config {
        /// Also write it to the --config path
        #[arg(long, default_value_t = false)]
        write: bool,
    },
}

fn read_snapshot(path: &Path) -> Result<BehaviorSnapshot> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot from {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Invalid behavior snapshot in {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => Default::default(),
    };

    if let Commands::Config { write } = cli.command {
        if write {
            let path = cli
                .config
                .as_deref()
                .context("--config is required with --write")?;
            save_config(path, &config)?;
            log::info!("Wrote config to {}", path.display());
        }
        return print_json(&config);
    }

    let db = Database::new(cli.db.clone())?;
    let detector = MoodDetector::new(db, config);
    let now = Utc::now();

    match cli.command {
        Commands::Classify { snapshot, refresh } => {
            let snapshot = read_snapshot(&snapshot)?;
            let result = if refresh {
                detector.refresh_mood(&snapshot, now).await
            } else {
                detector.detect_current_mood(&snapshot, now).await
            };
            print_json(&result)
        }
        Commands::Personality { snapshot } => {
            let snapshot = read_snapshot(&snapshot)?;
            print_json(&detector.adapt_personality(&snapshot, now).await)
        }
        Commands::Predict { snapshot } => {
            let snapshot = read_snapshot(&snapshot)?;
            print_json(&detector.predict(&snapshot, now).await?)
        }
        Commands::History { user, days } => {
            print_json(&detector.analyze_history(&user, days, now).await?)
        }
        Commands::Config { .. } => Ok(()),
    }
}
