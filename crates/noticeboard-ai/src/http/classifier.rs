//! Priority classifier backed by an HTTP service.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use noticeboard_core::error::ErrorKind;
use noticeboard_core::result::AppResult;
use noticeboard_core::traits::PriorityClassifier;
use noticeboard_core::types::{Priority, PriorityAssessment};

use super::{ClientError, build_client, read_json, require_url};

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    deadline: Option<String>,
}

/// `POST {url}` with `{"text"}`, expecting `{"priority", "deadline"}`.
///
/// The service may answer with any label; unknown labels fall back to
/// `Low`, and one containing `PASSED` (a deadline already gone) counts as
/// `Critical`.
#[derive(Debug, Clone)]
pub struct HttpPriorityClassifier {
    client: reqwest::Client,
    url: String,
}

impl HttpPriorityClassifier {
    /// Create a client for the classifier at `url`.
    pub fn new(url: &str, timeout: Duration) -> AppResult<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            url: require_url(url, "enrichment.classifier_url")?,
        })
    }
}

#[async_trait]
impl PriorityClassifier for HttpPriorityClassifier {
    fn name(&self) -> &str {
        "http"
    }

    async fn analyze(&self, text: &str) -> AppResult<PriorityAssessment> {
        debug!(url = %self.url, chars = text.len(), "Requesting priority");
        let resp = self
            .client
            .post(&self.url)
            .json(&AnalyzeRequest { text })
            .send()
            .await
            .map_err(|e| ClientError::from(e).into_app_error(ErrorKind::Enrichment, "classifier"))?;
        let body: AnalyzeResponse = read_json(resp)
            .await
            .map_err(|e| e.into_app_error(ErrorKind::Enrichment, "classifier"))?;

        Ok(PriorityAssessment {
            priority: body.priority.as_deref().map(parse_label).unwrap_or_default(),
            deadline: body.deadline.as_deref().and_then(parse_deadline),
        })
    }
}

/// Map a service label onto the priority set.
pub fn parse_label(label: &str) -> Priority {
    if label.to_uppercase().contains("PASSED") {
        return Priority::Critical;
    }
    label.parse().unwrap_or_else(|_| {
        warn!(label, "Unknown priority label; using Low");
        Priority::Low
    })
}

/// Accept RFC 3339 timestamps, naive `YYYY-MM-DD HH:MM:SS` (taken as UTC)
/// or a bare date (end of that day).
pub fn parse_deadline(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(ts.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let end = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
        return Some(date.and_time(end).and_utc());
    }
    warn!(deadline = raw, "Unparsable deadline from classifier; ignoring");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_label() {
        assert_eq!(parse_label("High"), Priority::High);
        assert_eq!(parse_label("critical"), Priority::Critical);
        assert_eq!(parse_label("Deadline PASSED"), Priority::Critical);
        assert_eq!(parse_label("Whenever"), Priority::Low);
    }

    #[test]
    fn test_parse_deadline_formats() {
        let end_of_day = Utc.with_ymd_and_hms(2026, 3, 13, 23, 59, 59).unwrap();
        assert_eq!(parse_deadline("2026-03-13"), Some(end_of_day));
        assert_eq!(parse_deadline("2026-03-13 23:59:59"), Some(end_of_day));
        assert_eq!(parse_deadline("2026-03-13T23:59:59Z"), Some(end_of_day));
        assert_eq!(
            parse_deadline("2026-03-14T01:59:59+02:00"),
            Some(end_of_day)
        );
        assert_eq!(parse_deadline("soon"), None);
        assert_eq!(parse_deadline(""), None);
    }

    #[test]
    fn test_response_tolerates_nulls() {
        let body: AnalyzeResponse =
            serde_json::from_str(r#"{"priority": "Medium", "deadline": null}"#).unwrap();
        assert_eq!(body.priority.as_deref(), Some("Medium"));
        assert!(body.deadline.is_none());
    }
}
