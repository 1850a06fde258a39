//! Response DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use noticeboard_core::types::{NoticeId, Priority};
use noticeboard_entity::notice::{Notice, NoticeSource, NoticeStatus};
use noticeboard_service::{CreatedNotice, ImageNotice};
use noticeboard_worker::FeederStatus;

/// A notice as the frontend sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoticeResponse {
    #[serde(rename = "_id")]
    pub id: NoticeId,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub deadline: Option<DateTime<Utc>>,
    pub user_id: Option<String>,
    pub status: NoticeStatus,
    pub completed: bool,
    #[serde(rename = "completedDate")]
    pub completed_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<NoticeSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_ref: Option<String>,
}

impl From<Notice> for NoticeResponse {
    fn from(n: Notice) -> Self {
        Self {
            id: n.id,
            title: n.title,
            description: n.description,
            priority: n.priority,
            deadline: n.deadline,
            user_id: n.user_id,
            status: n.status,
            completed: n.completed,
            completed_date: n.completed_date,
            created_at: n.created_at,
            source: n.source,
            external_ref: n.external_ref,
        }
    }
}

/// Reply to a manual create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub message: String,
    pub id: NoticeId,
    pub priority: Priority,
    pub deadline: Option<DateTime<Utc>>,
}

impl From<CreatedNotice> for CreatedResponse {
    fn from(c: CreatedNotice) -> Self {
        Self {
            message: "Notice created successfully".to_string(),
            id: c.id,
            priority: c.priority,
            deadline: c.deadline,
        }
    }
}

/// Reply to an image upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageCreatedResponse {
    pub message: String,
    pub id: NoticeId,
    pub summary: String,
    pub priority: Priority,
    pub deadline: Option<DateTime<Utc>>,
}

impl From<ImageNotice> for ImageCreatedResponse {
    fn from(c: ImageNotice) -> Self {
        Self {
            message: "Notice created from image".to_string(),
            id: c.id,
            summary: c.summary,
            priority: c.priority,
            deadline: c.deadline,
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check reply.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// `ok` when every dependency answered, `degraded` otherwise.
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub store: bool,
    pub uploads: bool,
    pub feeders: Vec<FeederStatus>,
}
