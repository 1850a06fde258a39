//! Email feeder: unseen messages from a mail bridge become notices.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use noticeboard_core::config::EmailFeedConfig;
use noticeboard_core::result::AppResult;
use noticeboard_entity::notice::{NoticeDraft, NoticeSource};

use super::{FeedError, Feeder, http};

/// Title used when a message has no subject.
const DEFAULT_EMAIL_TITLE: &str = "Email Notice";

/// A message as reported by the mail bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboxMessage {
    /// Message-ID, unique per mailbox.
    pub id: String,
    #[serde(default)]
    pub subject: Option<String>,
    /// Plain-text body.
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub received_at: Option<DateTime<Utc>>,
}

/// Access to an inbox that tracks which messages were handled.
#[async_trait]
pub trait InboxClient: Send + Sync + std::fmt::Debug + 'static {
    /// Up to `limit` messages not yet acknowledged.
    async fn fetch_unseen(&self, limit: usize) -> Result<Vec<InboxMessage>, FeedError>;

    /// Mark messages handled so they are not fetched again.
    async fn acknowledge(&self, ids: &[String]) -> Result<(), FeedError>;
}

/// Mail bridge speaking JSON over HTTP.
///
/// - `GET {url}/messages?unseen=true&limit=N` → `[InboxMessage]`
/// - `POST {url}/messages/ack` with `{"ids": [...]}`
#[derive(Debug, Clone)]
pub struct HttpInboxClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct AckRequest<'a> {
    ids: &'a [String],
}

impl HttpInboxClient {
    /// Create a client for the bridge at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let (client, base_url) = http::client(base_url, "feeders.email.url", timeout)?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl InboxClient for HttpInboxClient {
    async fn fetch_unseen(&self, limit: usize) -> Result<Vec<InboxMessage>, FeedError> {
        let url = format!("{}/messages?unseen=true&limit={limit}", self.base_url);
        let resp = self.client.get(&url).send().await?;
        http::json(resp).await
    }

    async fn acknowledge(&self, ids: &[String]) -> Result<(), FeedError> {
        let url = format!("{}/messages/ack", self.base_url);
        let resp = self.client.post(&url).json(&AckRequest { ids }).send().await?;
        http::check(resp).await?;
        Ok(())
    }
}

/// Polls an inbox and maps each message to a draft.
#[derive(Debug)]
pub struct EmailFeeder {
    client: Arc<dyn InboxClient>,
    interval: Duration,
    batch_size: usize,
    user_id: Option<String>,
}

impl EmailFeeder {
    /// Create a feeder over `client` using the email section of the config.
    pub fn new(client: Arc<dyn InboxClient>, config: &EmailFeedConfig) -> Self {
        Self {
            client,
            interval: Duration::from_secs(config.interval_seconds.max(1)),
            batch_size: config.batch_size.max(1),
            user_id: config.user_id.clone(),
        }
    }
}

/// Subject becomes the title, body the description. Returns `None` for
/// messages with neither.
pub fn message_to_draft(message: &InboxMessage, user_id: Option<String>) -> Option<NoticeDraft> {
    let subject = non_blank(message.subject.as_deref());
    let body = non_blank(message.body.as_deref());
    let description = body.or(subject)?;
    let title = subject.unwrap_or(DEFAULT_EMAIL_TITLE);

    Some(
        NoticeDraft::new(title, description)
            .with_user(user_id)
            .with_origin(NoticeSource::Email, message.id.clone()),
    )
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[async_trait]
impl Feeder for EmailFeeder {
    fn name(&self) -> &str {
        "email"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn poll(&self) -> Result<Vec<NoticeDraft>, FeedError> {
        let messages = self.client.fetch_unseen(self.batch_size).await?;
        debug!(count = messages.len(), "Fetched unseen messages");

        let mut drafts = Vec::with_capacity(messages.len());
        let mut empty = Vec::new();
        for message in &messages {
            match message_to_draft(message, self.user_id.clone()) {
                Some(draft) => drafts.push(draft),
                None => empty.push(message.id.clone()),
            }
        }

        if !empty.is_empty() {
            warn!(count = empty.len(), "Skipping messages without subject or body");
            self.client.acknowledge(&empty).await?;
        }
        Ok(drafts)
    }

    async fn acknowledge(&self, refs: &[String]) -> Result<(), FeedError> {
        self.client.acknowledge(refs).await
    }
}
