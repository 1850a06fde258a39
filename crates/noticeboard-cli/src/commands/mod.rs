//! CLI command definitions and dispatch.

pub mod evaluate;
pub mod migrate;
pub mod notice;

use clap::{Parser, Subcommand};

use noticeboard_core::config::AppConfig;
use noticeboard_core::error::AppError;

use crate::output::OutputFormat;

/// Notice board administration
#[derive(Debug, Parser)]
#[command(name = "noticeboard", version, about, long_about = None)]
pub struct Cli {
    /// Configuration file; defaults to `config/default.toml` plus the
    /// `NOTICEBOARD_ENV` overlay
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Inspect and manage notices
    Notice(notice::NoticeArgs),
    /// Measure the configured priority classifier against a labelled test set
    Evaluate(evaluate::EvaluateArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = load_config(self.config.as_deref())?;
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &config).await,
            Commands::Notice(args) => notice::execute(args, &config, self.format).await,
            Commands::Evaluate(args) => evaluate::execute(args, &config, self.format).await,
        }
    }
}

/// Helper: load configuration from an explicit file or the config directory
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, AppError> {
    match config_path {
        Some(path) => AppConfig::load_file(path),
        None => {
            let env = std::env::var("NOTICEBOARD_ENV").unwrap_or_else(|_| "development".to_string());
            AppConfig::load(&env)
        }
    }
}
