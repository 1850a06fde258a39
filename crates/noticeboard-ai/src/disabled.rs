//! OCR engine that never reads anything.

use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use noticeboard_core::result::AppResult;
use noticeboard_core::traits::OcrEngine;

/// OCR stand-in for deployments without an OCR service. Every image
/// yields empty text, so image ingestion always ends in an extraction error.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledOcr;

#[async_trait]
impl OcrEngine for DisabledOcr {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn extract_text(&self, image_path: &Path) -> AppResult<String> {
        debug!(path = %image_path.display(), "OCR disabled; returning no text");
        Ok(String::new())
    }
}
