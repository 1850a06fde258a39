//! OCR engine backed by an HTTP service.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::fs;
use tracing::debug;

use noticeboard_core::error::{AppError, ErrorKind};
use noticeboard_core::result::AppResult;
use noticeboard_core::traits::OcrEngine;

use super::{ClientError, build_client, read_json, require_url};

#[derive(Deserialize)]
struct OcrResponse {
    #[serde(default)]
    text: String,
}

/// `POST {url}` with the raw image bytes, expecting `{"text"}`.
#[derive(Debug, Clone)]
pub struct HttpOcrEngine {
    client: reqwest::Client,
    url: String,
}

impl HttpOcrEngine {
    /// Create a client for the OCR service at `url`.
    pub fn new(url: &str, timeout: Duration) -> AppResult<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            url: require_url(url, "ocr.url")?,
        })
    }
}

#[async_trait]
impl OcrEngine for HttpOcrEngine {
    fn name(&self) -> &str {
        "http"
    }

    async fn extract_text(&self, image_path: &Path) -> AppResult<String> {
        let bytes = fs::read(image_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to read image: {}", image_path.display()),
                e,
            )
        })?;

        debug!(url = %self.url, bytes = bytes.len(), "Requesting OCR");
        let resp = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()
            .await
            .map_err(|e| ClientError::from(e).into_app_error(ErrorKind::ExternalService, "OCR"))?;
        let body: OcrResponse = read_json(resp)
            .await
            .map_err(|e| e.into_app_error(ErrorKind::ExternalService, "OCR"))?;
        Ok(body.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_image_is_storage_error() {
        let engine = HttpOcrEngine::new("http://127.0.0.1:9/ocr", Duration::from_secs(1)).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let err = engine
            .extract_text(&dir.path().join("absent.png"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Storage);
    }
}
