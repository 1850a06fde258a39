//! JSON-over-HTTP collaborator clients.
//!
//! Each client posts to a single configured URL. Non-2xx responses and
//! transport failures are reported as [`ClientError`] and converted to an
//! [`AppError`] of the caller's kind.

pub mod classifier;
pub mod ocr;
pub mod summarizer;

use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;

use noticeboard_core::error::{AppError, ErrorKind};

pub use classifier::HttpPriorityClassifier;
pub use ocr::HttpOcrEngine;
pub use summarizer::HttpSummarizer;

/// Failure talking to a collaborator service.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
}

impl ClientError {
    /// Wrap as an application error of `kind`, naming the collaborator.
    pub fn into_app_error(self, kind: ErrorKind, collaborator: &str) -> AppError {
        AppError::with_source(kind, format!("{collaborator} service failed: {self}"), self)
    }
}

/// Build a client with the collaborator's timeout.
pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client, AppError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
        })
}

/// Reject an empty service URL at startup rather than on first use.
pub(crate) fn require_url(url: &str, setting: &str) -> Result<String, AppError> {
    let url = url.trim().trim_end_matches('/');
    if url.is_empty() {
        return Err(AppError::configuration(format!("{setting} must be set")));
    }
    Ok(url.to_string())
}

/// Check the status and decode a JSON body.
pub(crate) async fn read_json<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Server {
            status: status.as_u16(),
            body,
        });
    }
    Ok(resp.json().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_url_trims_trailing_slash() {
        assert_eq!(
            require_url(" http://nlp:8000/summarize/ ", "enrichment.summarizer_url").unwrap(),
            "http://nlp:8000/summarize"
        );
        let err = require_url("", "ocr.url").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
        assert!(err.message.contains("ocr.url"));
    }

    #[test]
    fn test_server_error_conversion() {
        let err = ClientError::Server {
            status: 503,
            body: "busy".to_string(),
        }
        .into_app_error(ErrorKind::Enrichment, "summarizer");
        assert_eq!(err.kind, ErrorKind::Enrichment);
        assert_eq!(err.message, "summarizer service failed: server returned 503: busy");
    }
}
