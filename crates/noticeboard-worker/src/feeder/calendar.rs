//! Calendar feeder: upcoming events become notices with a deadline.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use noticeboard_core::config::CalendarFeedConfig;
use noticeboard_core::error::AppError;
use noticeboard_core::result::AppResult;
use noticeboard_entity::notice::{NoticeDraft, NoticeSource};

use super::{FeedError, Feeder, http};

/// Longest look-ahead window accepted, in days.
const MAX_LOOKAHEAD_DAYS: i64 = 366;

/// An event as reported by the calendar bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Provider event id.
    pub id: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
}

/// Read access to a calendar.
#[async_trait]
pub trait CalendarClient: Send + Sync + std::fmt::Debug + 'static {
    /// Events starting in `[from, to)`.
    async fn upcoming(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, FeedError>;
}

/// Calendar bridge speaking JSON over HTTP:
/// `GET {url}/events?from=<rfc3339>&to=<rfc3339>` → `[CalendarEvent]`.
#[derive(Debug, Clone)]
pub struct HttpCalendarClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCalendarClient {
    /// Create a client for the bridge at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let (client, base_url) = http::client(base_url, "feeders.calendar.url", timeout)?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl CalendarClient for HttpCalendarClient {
    async fn upcoming(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, FeedError> {
        let url = format!(
            "{}/events?from={}&to={}",
            self.base_url,
            from.format("%Y-%m-%dT%H:%M:%SZ"),
            to.format("%Y-%m-%dT%H:%M:%SZ")
        );
        let resp = self.client.get(&url).send().await?;
        http::json(resp).await
    }
}

/// Pulls events inside a look-ahead window.
#[derive(Debug)]
pub struct CalendarFeeder {
    client: Arc<dyn CalendarClient>,
    interval: Duration,
    lookahead: chrono::Duration,
    user_id: Option<String>,
}

impl CalendarFeeder {
    /// Create a feeder over `client` using the calendar section of the config.
    ///
    /// Fails when `lookahead_days` is outside `1..=366`.
    pub fn new(client: Arc<dyn CalendarClient>, config: &CalendarFeedConfig) -> AppResult<Self> {
        let days = config.lookahead_days;
        let lookahead = Some(days)
            .filter(|d| (1..=MAX_LOOKAHEAD_DAYS).contains(d))
            .and_then(chrono::Duration::try_days)
            .ok_or_else(|| {
                AppError::configuration(format!(
                    "feeders.calendar.lookahead_days must be between 1 and {MAX_LOOKAHEAD_DAYS}, got {days}"
                ))
            })?;

        Ok(Self {
            client,
            interval: Duration::from_secs(config.interval_seconds.max(1)),
            lookahead,
            user_id: config.user_id.clone(),
        })
    }
}

/// Summary becomes the title, description (or the summary) the body, and
/// the start time the deadline hint. Events with no text are skipped.
pub fn event_to_draft(event: &CalendarEvent, user_id: Option<String>) -> Option<NoticeDraft> {
    let summary = event.summary.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let details = event
        .description
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let title = summary.or(details)?;
    let description = details.unwrap_or(title);

    Some(
        NoticeDraft::new(title, description)
            .with_user(user_id)
            .with_origin(NoticeSource::Calendar, event.id.clone())
            .with_deadline_hint(event.start),
    )
}

#[async_trait]
impl Feeder for CalendarFeeder {
    fn name(&self) -> &str {
        "calendar"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn poll(&self) -> Result<Vec<NoticeDraft>, FeedError> {
        let now = Utc::now();
        let until = now
            .checked_add_signed(self.lookahead)
            .ok_or_else(|| AppError::internal("Calendar look-ahead window out of range"))?;
        let events = self.client.upcoming(now, until).await?;
        debug!(count = events.len(), "Fetched upcoming events");
        Ok(events
            .iter()
            .filter_map(|e| event_to_draft(e, self.user_id.clone()))
            .collect())
    }
}
