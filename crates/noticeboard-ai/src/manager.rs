//! Builds the configured enrichment collaborators.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use noticeboard_core::config::{EnrichmentConfig, OcrConfig};
use noticeboard_core::error::AppError;
use noticeboard_core::result::AppResult;
use noticeboard_core::traits::{OcrEngine, PriorityClassifier, Summarizer};

use crate::disabled::DisabledOcr;
use crate::extractive::ExtractiveSummarizer;
use crate::http::{HttpOcrEngine, HttpPriorityClassifier, HttpSummarizer};
use crate::keyword::KeywordPriorityClassifier;

/// The summarizer, classifier and OCR engine selected by configuration.
#[derive(Debug, Clone)]
pub struct EnrichmentManager {
    summarizer: Arc<dyn Summarizer>,
    classifier: Arc<dyn PriorityClassifier>,
    ocr: Arc<dyn OcrEngine>,
}

impl EnrichmentManager {
    /// Construct each collaborator from its provider name.
    pub fn new(enrichment: &EnrichmentConfig, ocr: &OcrConfig) -> AppResult<Self> {
        let timeout = Duration::from_secs(enrichment.timeout_seconds);

        let summarizer: Arc<dyn Summarizer> = match enrichment.summarizer.as_str() {
            "extractive" => Arc::new(ExtractiveSummarizer::from_config(enrichment)),
            "http" => Arc::new(HttpSummarizer::new(&enrichment.summarizer_url, timeout)?),
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown summarizer: '{other}'. Supported: extractive, http"
                )));
            }
        };

        let classifier: Arc<dyn PriorityClassifier> = match enrichment.classifier.as_str() {
            "keyword" => Arc::new(KeywordPriorityClassifier::new()),
            "http" => Arc::new(HttpPriorityClassifier::new(&enrichment.classifier_url, timeout)?),
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown priority classifier: '{other}'. Supported: keyword, http"
                )));
            }
        };

        let ocr: Arc<dyn OcrEngine> = match ocr.provider.as_str() {
            "disabled" => Arc::new(DisabledOcr),
            "http" => Arc::new(HttpOcrEngine::new(
                &ocr.url,
                Duration::from_secs(ocr.timeout_seconds),
            )?),
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown OCR provider: '{other}'. Supported: disabled, http"
                )));
            }
        };

        info!(
            summarizer = summarizer.name(),
            classifier = classifier.name(),
            ocr = ocr.name(),
            "Enrichment collaborators ready"
        );

        Ok(Self {
            summarizer,
            classifier,
            ocr,
        })
    }

    /// The configured summarizer.
    pub fn summarizer(&self) -> Arc<dyn Summarizer> {
        Arc::clone(&self.summarizer)
    }

    /// The configured priority classifier.
    pub fn classifier(&self) -> Arc<dyn PriorityClassifier> {
        Arc::clone(&self.classifier)
    }

    /// The configured OCR engine.
    pub fn ocr(&self) -> Arc<dyn OcrEngine> {
        Arc::clone(&self.ocr)
    }
}
