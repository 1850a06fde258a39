//! Scheduled maintenance configuration.

use serde::{Deserialize, Serialize};

/// Cron scheduler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether scheduled maintenance runs at all.
    #[serde(default = "super::default_true")]
    pub enabled: bool,
    /// Cron expression (with seconds) for the upload retention sweep.
    #[serde(default = "default_upload_sweep_cron")]
    pub upload_sweep_cron: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            upload_sweep_cron: default_upload_sweep_cron(),
        }
    }
}

fn default_upload_sweep_cron() -> String {
    "0 0 * * * *".to_string()
}
