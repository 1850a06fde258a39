//! Background feeder configuration.

use serde::{Deserialize, Serialize};

/// Settings shared by all feeders plus one section per feeder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedersConfig {
    /// Email listener.
    #[serde(default)]
    pub email: EmailFeedConfig,
    /// Calendar sync.
    #[serde(default)]
    pub calendar: CalendarFeedConfig,
    /// Ceiling for the restart backoff of a crashed feeder.
    #[serde(default = "default_max_backoff")]
    pub restart_backoff_max_seconds: u64,
    /// Timeout for each request a feeder makes to its source.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
}

impl Default for FeedersConfig {
    fn default() -> Self {
        Self {
            email: EmailFeedConfig::default(),
            calendar: CalendarFeedConfig::default(),
            restart_backoff_max_seconds: default_max_backoff(),
            http_timeout_seconds: default_http_timeout(),
        }
    }
}

/// Email listener settings. Messages are pulled from an HTTP mail bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailFeedConfig {
    /// Whether the feeder runs.
    #[serde(default)]
    pub enabled: bool,
    /// Base URL of the mail bridge.
    #[serde(default)]
    pub url: String,
    /// Seconds between inbox polls.
    #[serde(default = "default_email_interval")]
    pub interval_seconds: u64,
    /// Maximum messages pulled per poll.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Owner assigned to email notices (`None` broadcasts them).
    #[serde(default)]
    pub user_id: Option<String>,
}

impl Default for EmailFeedConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: String::new(),
            interval_seconds: default_email_interval(),
            batch_size: default_batch_size(),
            user_id: None,
        }
    }
}

/// Calendar sync settings. Events are pulled from an HTTP calendar bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarFeedConfig {
    /// Whether the feeder runs.
    #[serde(default)]
    pub enabled: bool,
    /// Base URL of the calendar bridge.
    #[serde(default)]
    pub url: String,
    /// Seconds between syncs.
    #[serde(default = "default_calendar_interval")]
    pub interval_seconds: u64,
    /// How far ahead events are pulled.
    #[serde(default = "default_lookahead_days")]
    pub lookahead_days: i64,
    /// Owner assigned to calendar notices (`None` broadcasts them).
    #[serde(default)]
    pub user_id: Option<String>,
}

impl Default for CalendarFeedConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: String::new(),
            interval_seconds: default_calendar_interval(),
            lookahead_days: default_lookahead_days(),
            user_id: None,
        }
    }
}

fn default_max_backoff() -> u64 {
    300
}

fn default_http_timeout() -> u64 {
    15
}

fn default_email_interval() -> u64 {
    30
}

fn default_batch_size() -> usize {
    20
}

fn default_calendar_interval() -> u64 {
    60
}

fn default_lookahead_days() -> i64 {
    7
}
