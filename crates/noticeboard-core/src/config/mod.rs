//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. Every field has a default so a partial file is enough to boot.

pub mod app;
pub mod database;
pub mod enrichment;
pub mod feeders;
pub mod logging;
pub mod uploads;
pub mod worker;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::database::DatabaseConfig;
pub use self::enrichment::{EnrichmentConfig, IngestionConfig, OcrConfig};
pub use self::feeders::{CalendarFeedConfig, EmailFeedConfig, FeedersConfig};
pub use self::logging::LoggingConfig;
pub use self::uploads::UploadsConfig;
pub use self::worker::WorkerConfig;

use crate::error::AppError;

/// Prefix for environment variable overrides, e.g. `NOTICEBOARD__SERVER__PORT`.
const ENV_PREFIX: &str = "NOTICEBOARD";

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Notice store settings.
    pub database: DatabaseConfig,
    /// Uploaded image storage and retention.
    pub uploads: UploadsConfig,
    /// Pipeline-level settings (defaults, thresholds).
    pub ingestion: IngestionConfig,
    /// Summarizer and priority classifier settings.
    pub enrichment: EnrichmentConfig,
    /// OCR collaborator settings.
    pub ocr: OcrConfig,
    /// Background feeder settings (email, calendar).
    pub feeders: FeedersConfig,
    /// Scheduled maintenance settings.
    pub worker: WorkerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from the `config/` directory.
    ///
    /// Merges `config/default.toml` with the `config/{env}.toml` overlay and
    /// environment variables prefixed with `NOTICEBOARD__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(env_source())
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Load configuration from a single explicit file plus environment overrides.
    pub fn load_file(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(true))
            .add_source(env_source())
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to read '{path}': {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

fn default_true() -> bool {
    true
}
