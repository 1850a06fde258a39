//! Summarizer backed by an HTTP service.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use noticeboard_core::error::ErrorKind;
use noticeboard_core::result::AppResult;
use noticeboard_core::traits::Summarizer;

use super::{ClientError, build_client, read_json, require_url};

#[derive(Serialize)]
struct SummarizeRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct SummarizeResponse {
    #[serde(default)]
    summary: String,
}

/// `POST {url}` with `{"text"}`, expecting `{"summary"}`.
#[derive(Debug, Clone)]
pub struct HttpSummarizer {
    client: reqwest::Client,
    url: String,
}

impl HttpSummarizer {
    /// Create a client for the summarizer at `url`.
    pub fn new(url: &str, timeout: Duration) -> AppResult<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            url: require_url(url, "enrichment.summarizer_url")?,
        })
    }
}

#[async_trait]
impl Summarizer for HttpSummarizer {
    fn name(&self) -> &str {
        "http"
    }

    async fn summarize(&self, text: &str) -> AppResult<String> {
        debug!(url = %self.url, chars = text.len(), "Requesting summary");
        let resp = self
            .client
            .post(&self.url)
            .json(&SummarizeRequest { text })
            .send()
            .await
            .map_err(|e| ClientError::from(e).into_app_error(ErrorKind::Enrichment, "summarizer"))?;
        let body: SummarizeResponse = read_json(resp)
            .await
            .map_err(|e| e.into_app_error(ErrorKind::Enrichment, "summarizer"))?;
        Ok(body.summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_summary_field_is_empty() {
        let body: SummarizeResponse = serde_json::from_str("{}").unwrap();
        assert!(body.summary.is_empty());
    }

    #[test]
    fn test_requires_url() {
        assert!(HttpSummarizer::new("", Duration::from_secs(1)).is_err());
    }
}
