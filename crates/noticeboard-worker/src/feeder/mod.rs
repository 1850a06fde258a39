//! Feeders: long-lived producers of notice drafts.

pub mod calendar;
pub mod email;
pub mod supervisor;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use noticeboard_core::config::FeedersConfig;
use noticeboard_core::error::{AppError, ErrorKind};
use noticeboard_core::result::AppResult;
use noticeboard_entity::notice::NoticeDraft;

pub use calendar::{CalendarClient, CalendarEvent, CalendarFeeder, HttpCalendarClient};
pub use email::{EmailFeeder, HttpInboxClient, InboxClient, InboxMessage};
pub use supervisor::{FeederStatus, FeederSupervisor};

/// Failure fetching from or acknowledging to a feed source.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("feed request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("feed returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error(transparent)]
    App(#[from] AppError),
}

impl From<FeedError> for AppError {
    fn from(err: FeedError) -> Self {
        match err {
            FeedError::App(e) => e,
            other => AppError::with_source(ErrorKind::ExternalService, other.to_string(), other),
        }
    }
}

/// A source of notice drafts polled on a fixed cadence.
#[async_trait]
pub trait Feeder: Send + Sync + std::fmt::Debug + 'static {
    /// Stable name used in logs and status reports.
    fn name(&self) -> &str;

    /// Time between polls.
    fn interval(&self) -> Duration;

    /// Fetch new items as drafts.
    async fn poll(&self) -> Result<Vec<NoticeDraft>, FeedError>;

    /// Tell the source these items are handled. `refs` are the drafts'
    /// external refs. The default does nothing.
    async fn acknowledge(&self, _refs: &[String]) -> Result<(), FeedError> {
        Ok(())
    }
}

/// Build the feeders enabled in configuration.
pub fn build_feeders(config: &FeedersConfig) -> AppResult<Vec<Arc<dyn Feeder>>> {
    let timeout = Duration::from_secs(config.http_timeout_seconds);
    let mut feeders: Vec<Arc<dyn Feeder>> = Vec::new();

    if config.email.enabled {
        let client = HttpInboxClient::new(&config.email.url, timeout)?;
        feeders.push(Arc::new(EmailFeeder::new(Arc::new(client), &config.email)));
    }
    if config.calendar.enabled {
        let client = HttpCalendarClient::new(&config.calendar.url, timeout)?;
        feeders.push(Arc::new(CalendarFeeder::new(
            Arc::new(client),
            &config.calendar,
        )?));
    }
    Ok(feeders)
}

/// Shared HTTP plumbing for the feed clients.
pub(crate) mod http {
    use std::time::Duration;

    use serde::de::DeserializeOwned;

    use noticeboard_core::error::{AppError, ErrorKind};

    use super::FeedError;

    pub fn client(base_url: &str, setting: &str, timeout: Duration) -> Result<(reqwest::Client, String), AppError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(AppError::configuration(format!("{setting} must be set")));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;
        Ok((client, base_url.to_string()))
    }

    pub async fn check(resp: reqwest::Response) -> Result<reqwest::Response, FeedError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FeedError::Server {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp)
    }

    pub async fn json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, FeedError> {
        Ok(check(resp).await?.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_feeders_by_default() {
        let feeders = build_feeders(&FeedersConfig::default()).unwrap();
        assert!(feeders.is_empty());
    }

    #[test]
    fn test_enabled_feeder_requires_url() {
        let mut config = FeedersConfig::default();
        config.email.enabled = true;
        let err = build_feeders(&config).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_enabled_feeders_are_built() {
        let mut config = FeedersConfig::default();
        config.email.enabled = true;
        config.email.url = "http://mail-bridge:8025".to_string();
        config.calendar.enabled = true;
        config.calendar.url = "http://calendar-bridge:8030/".to_string();

        let names: Vec<String> = build_feeders(&config)
            .unwrap()
            .iter()
            .map(|f| f.name().to_string())
            .collect();
        assert_eq!(names, vec!["email", "calendar"]);
    }

    #[test]
    fn test_feed_error_maps_to_external_service() {
        let err: AppError = FeedError::Server {
            status: 502,
            body: "down".to_string(),
        }
        .into();
        assert_eq!(err.kind, ErrorKind::ExternalService);
        assert_eq!(err.message, "feed returned 502: down");
    }
}
