//! Request DTOs.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/notices`.
///
/// Fields are optional here so a missing one surfaces as the pipeline's
/// validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateNoticeRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub user_id: Option<String>,
}

/// Query of `GET /api/notices`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListNoticesQuery {
    /// Viewer; omitted or blank lists everything.
    pub user_id: Option<String>,
}
