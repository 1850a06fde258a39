//! Upload storage configuration.

use serde::{Deserialize, Serialize};

/// Where uploaded notice images are written and how long they are kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadsConfig {
    /// Directory receiving uploaded images.
    #[serde(default = "default_directory")]
    pub directory: String,
    /// Hours an uploaded image is kept before the sweep removes it.
    /// `0` keeps uploads forever.
    #[serde(default = "default_retention_hours")]
    pub retention_hours: u64,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            retention_hours: default_retention_hours(),
        }
    }
}

fn default_directory() -> String {
    "uploads".to_string()
}

fn default_retention_hours() -> u64 {
    24
}
