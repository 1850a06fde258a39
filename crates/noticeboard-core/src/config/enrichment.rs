//! Ingestion, enrichment and OCR collaborator configuration.

use serde::{Deserialize, Serialize};

/// Pipeline-level defaults and thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionConfig {
    /// Title given to notices created from an image when the caller sends none.
    #[serde(default = "default_image_title")]
    pub default_image_title: String,
    /// Minimum trimmed length (in characters) of usable OCR text.
    #[serde(default = "default_min_text_chars")]
    pub min_text_chars: usize,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            default_image_title: default_image_title(),
            min_text_chars: default_min_text_chars(),
        }
    }
}

/// Summarizer and priority classifier selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    /// Summarizer provider: `"extractive"` or `"http"`.
    #[serde(default = "default_summarizer")]
    pub summarizer: String,
    /// Endpoint for the `http` summarizer.
    #[serde(default)]
    pub summarizer_url: String,
    /// Classifier provider: `"keyword"` or `"http"`.
    #[serde(default = "default_classifier")]
    pub classifier: String,
    /// Endpoint for the `http` classifier.
    #[serde(default)]
    pub classifier_url: String,
    /// Upper bound for a single summarizer or classifier call.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Sentences kept by the extractive summarizer.
    #[serde(default = "default_max_sentences")]
    pub max_summary_sentences: usize,
    /// Character budget of the extractive summarizer.
    #[serde(default = "default_max_chars")]
    pub max_summary_chars: usize,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            summarizer: default_summarizer(),
            summarizer_url: String::new(),
            classifier: default_classifier(),
            classifier_url: String::new(),
            timeout_seconds: default_timeout(),
            max_summary_sentences: default_max_sentences(),
            max_summary_chars: default_max_chars(),
        }
    }
}

/// OCR collaborator selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    /// OCR provider: `"disabled"` (always reads nothing) or `"http"`.
    #[serde(default = "default_ocr_provider")]
    pub provider: String,
    /// Endpoint for the `http` provider.
    #[serde(default)]
    pub url: String,
    /// Upper bound for a single OCR call.
    #[serde(default = "default_ocr_timeout")]
    pub timeout_seconds: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            provider: default_ocr_provider(),
            url: String::new(),
            timeout_seconds: default_ocr_timeout(),
        }
    }
}

fn default_image_title() -> String {
    "Image Notice".to_string()
}

fn default_min_text_chars() -> usize {
    3
}

fn default_summarizer() -> String {
    "extractive".to_string()
}

fn default_classifier() -> String {
    "keyword".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_max_sentences() -> usize {
    3
}

fn default_max_chars() -> usize {
    400
}

fn default_ocr_provider() -> String {
    "disabled".to_string()
}

fn default_ocr_timeout() -> u64 {
    60
}
