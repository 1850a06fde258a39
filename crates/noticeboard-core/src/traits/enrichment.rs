//! Contracts for the external text collaborators used by the ingestion
//! pipeline. Each one is a black box: text (or an image path) in, text or a
//! label out.

use std::path::Path;

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::priority::PriorityAssessment;

/// Shortens long notice text.
#[async_trait]
pub trait Summarizer: Send + Sync + std::fmt::Debug + 'static {
    /// Provider name for logs (e.g. `"extractive"`, `"http"`).
    fn name(&self) -> &str;

    /// Return a summary of `text`. May return the input unchanged, and may
    /// return an empty string for empty input; callers handle the fallback.
    async fn summarize(&self, text: &str) -> AppResult<String>;
}

/// Assigns a priority label and detects a deadline.
#[async_trait]
pub trait PriorityClassifier: Send + Sync + std::fmt::Debug + 'static {
    /// Provider name for logs.
    fn name(&self) -> &str;

    /// Classify `text`. Always yields a priority (defaulting to `Low`).
    async fn analyze(&self, text: &str) -> AppResult<PriorityAssessment>;
}

/// Reads text out of an image file.
#[async_trait]
pub trait OcrEngine: Send + Sync + std::fmt::Debug + 'static {
    /// Provider name for logs.
    fn name(&self) -> &str;

    /// Best-effort extraction. An empty string means "could not read" and
    /// is not an error.
    async fn extract_text(&self, image_path: &Path) -> AppResult<String>;
}
