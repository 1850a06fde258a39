//! Ingestion service: turns caller input, images and feed items into stored
//! notices.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use noticeboard_core::config::{EnrichmentConfig, IngestionConfig, OcrConfig};
use noticeboard_core::error::{AppError, ErrorKind};
use noticeboard_core::result::AppResult;
use noticeboard_core::traits::{OcrEngine, PriorityClassifier, Summarizer};
use noticeboard_core::types::{NoticeId, Priority, PriorityAssessment};
use noticeboard_database::NoticeStore;
use noticeboard_entity::notice::{NewNotice, NoticeDraft, NoticeSource};
use noticeboard_storage::UploadStorage;

use super::guard::call_guarded;
use super::normalize::normalize_ocr_text;

/// Tunables for the pipeline.
#[derive(Debug, Clone)]
pub struct IngestionSettings {
    /// Title given to image notices when the caller supplies none.
    pub default_image_title: String,
    /// Minimum readable OCR text length, in characters.
    pub min_text_chars: usize,
    /// Bound on each summarizer or classifier call.
    pub enrichment_timeout: Duration,
    /// Bound on each OCR call.
    pub ocr_timeout: Duration,
}

impl IngestionSettings {
    /// Collect the settings from their configuration sections.
    pub fn from_config(
        ingestion: &IngestionConfig,
        enrichment: &EnrichmentConfig,
        ocr: &OcrConfig,
    ) -> Self {
        Self {
            default_image_title: ingestion.default_image_title.clone(),
            min_text_chars: ingestion.min_text_chars,
            enrichment_timeout: Duration::from_secs(enrichment.timeout_seconds),
            ocr_timeout: Duration::from_secs(ocr.timeout_seconds),
        }
    }
}

impl Default for IngestionSettings {
    fn default() -> Self {
        Self::from_config(
            &IngestionConfig::default(),
            &EnrichmentConfig::default(),
            &OcrConfig::default(),
        )
    }
}

/// Result of a manual or feed-driven creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedNotice {
    /// Id assigned by the store.
    pub id: NoticeId,
    /// Assigned priority.
    pub priority: Priority,
    /// Inferred deadline.
    pub deadline: Option<DateTime<Utc>>,
}

/// Result of an image-driven creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageNotice {
    /// Id assigned by the store.
    pub id: NoticeId,
    /// Text stored as the description.
    pub summary: String,
    /// Assigned priority.
    pub priority: Priority,
    /// Inferred deadline.
    pub deadline: Option<DateTime<Utc>>,
}

/// Outcome of ingesting a feed item.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftOutcome {
    /// A new notice was stored.
    Created(CreatedNotice),
    /// The item was already on the board; nothing was written.
    Duplicate,
}

/// An uploaded image plus the form fields sent with it.
#[derive(Debug, Clone, Default)]
pub struct ImageUpload {
    /// Image body; `None` when the form had no image part.
    pub bytes: Option<Bytes>,
    /// Client-supplied filename.
    pub filename: String,
    /// Owner.
    pub user_id: Option<String>,
    /// Optional title; the configured default is used when blank.
    pub title: Option<String>,
}

/// Everything that survives enrichment, ready to insert.
struct Enriched {
    description: String,
    assessment: PriorityAssessment,
}

/// The ingestion pipeline.
///
/// Holds only shared handles; every call is independent and safe to run
/// concurrently with others.
#[derive(Clone)]
pub struct IngestionService {
    store: Arc<dyn NoticeStore>,
    summarizer: Arc<dyn Summarizer>,
    classifier: Arc<dyn PriorityClassifier>,
    ocr: Arc<dyn OcrEngine>,
    uploads: Arc<UploadStorage>,
    settings: IngestionSettings,
}

impl std::fmt::Debug for IngestionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestionService")
            .field("summarizer", &self.summarizer.name())
            .field("classifier", &self.classifier.name())
            .field("ocr", &self.ocr.name())
            .finish()
    }
}

impl IngestionService {
    /// Creates a new ingestion service.
    pub fn new(
        store: Arc<dyn NoticeStore>,
        summarizer: Arc<dyn Summarizer>,
        classifier: Arc<dyn PriorityClassifier>,
        ocr: Arc<dyn OcrEngine>,
        uploads: Arc<UploadStorage>,
        settings: IngestionSettings,
    ) -> Self {
        Self {
            store,
            summarizer,
            classifier,
            ocr,
            uploads,
            settings,
        }
    }

    /// Create a notice from caller-supplied fields.
    ///
    /// The description is summarized and classified before the insert; any
    /// failure leaves the store untouched.
    pub async fn create_from_fields(
        &self,
        title: &str,
        description: &str,
        user_id: Option<String>,
    ) -> AppResult<CreatedNotice> {
        require_fields(title, description)?;

        let enriched = self.enrich(description).await?;
        let new = NewNotice::new(title, enriched.description)?
            .owned_by(user_id)
            .with_priority(enriched.assessment.priority, enriched.assessment.deadline);
        let notice = self.store.insert(new).await?;

        info!(
            notice_id = %notice.id,
            priority = %notice.priority,
            "Notice created"
        );
        Ok(CreatedNotice {
            id: notice.id,
            priority: notice.priority,
            deadline: notice.deadline,
        })
    }

    /// Create a notice from a feed item, skipping items already stored.
    ///
    /// A deadline hint from the feed is used when the classifier finds none.
    pub async fn create_from_draft(&self, draft: NoticeDraft) -> AppResult<DraftOutcome> {
        require_fields(&draft.title, &draft.description)?;

        if let (Some(source), Some(external_ref)) = (draft.source, draft.external_ref.as_deref()) {
            if self
                .store
                .find_by_external_ref(source, external_ref)
                .await?
                .is_some()
            {
                debug!(%source, external_ref, "Feed item already ingested");
                return Ok(DraftOutcome::Duplicate);
            }
        }

        let enriched = self.enrich(&draft.description).await?;
        let deadline = enriched.assessment.deadline.or(draft.deadline_hint);
        let new = NewNotice::new(draft.title, enriched.description)?
            .owned_by(draft.user_id)
            .with_priority(enriched.assessment.priority, deadline)
            .with_source(draft.source, draft.external_ref);

        match self.store.insert(new).await {
            Ok(notice) => {
                info!(
                    notice_id = %notice.id,
                    source = ?notice.source,
                    priority = %notice.priority,
                    "Notice created from feed"
                );
                Ok(DraftOutcome::Created(CreatedNotice {
                    id: notice.id,
                    priority: notice.priority,
                    deadline: notice.deadline,
                }))
            }
            // Another poll stored the same item between the lookup and the insert.
            Err(e) if e.kind == ErrorKind::Conflict => Ok(DraftOutcome::Duplicate),
            Err(e) => Err(e),
        }
    }

    /// Create a notice from an uploaded image.
    ///
    /// The image is saved to the upload area first and stays there until
    /// the retention sweep, whatever happens afterwards.
    pub async fn create_from_image(&self, upload: ImageUpload) -> AppResult<ImageNotice> {
        let bytes = match upload.bytes {
            Some(bytes) if !bytes.is_empty() => bytes,
            _ => return Err(AppError::validation("No image uploaded")),
        };

        let stored = self.uploads.save(&upload.filename, &bytes).await?;
        debug!(upload = %stored.name, bytes = stored.size_bytes, "Image saved for OCR");

        let ocr = Arc::clone(&self.ocr);
        let path = stored.path.clone();
        let raw = call_guarded("OCR", self.settings.ocr_timeout, ErrorKind::Internal, async move {
            ocr.extract_text(&path).await
        })
        .await?;

        if raw.trim().chars().count() < self.settings.min_text_chars {
            info!(upload = %stored.name, "OCR returned no usable text");
            return Err(AppError::extraction("OCR could not read text"));
        }
        let text = normalize_ocr_text(&raw);
        if text.chars().count() < self.settings.min_text_chars {
            info!(upload = %stored.name, "OCR text empty after cleanup");
            return Err(AppError::extraction("OCR could not read text"));
        }

        let enriched = self.enrich(&text).await?;
        let title = upload
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| self.settings.default_image_title.clone());
        let new = NewNotice::new(title, enriched.description)?
            .owned_by(upload.user_id)
            .with_priority(enriched.assessment.priority, enriched.assessment.deadline)
            .with_source(Some(NoticeSource::Ocr), None);
        let notice = self.store.insert(new).await?;

        info!(
            notice_id = %notice.id,
            upload = %stored.name,
            priority = %notice.priority,
            "Notice created from image"
        );
        Ok(ImageNotice {
            id: notice.id,
            summary: notice.description,
            priority: notice.priority,
            deadline: notice.deadline,
        })
    }

    /// Summarize then classify. An empty summary falls back to `text`.
    async fn enrich(&self, text: &str) -> AppResult<Enriched> {
        let summarizer = Arc::clone(&self.summarizer);
        let input = text.to_string();
        let summary = call_guarded(
            "summarizer",
            self.settings.enrichment_timeout,
            ErrorKind::Enrichment,
            async move { summarizer.summarize(&input).await },
        )
        .await?;

        let description = if summary.trim().is_empty() {
            debug!("Summarizer returned nothing; keeping original text");
            text.to_string()
        } else {
            summary
        };

        let classifier = Arc::clone(&self.classifier);
        let input = description.clone();
        let assessment = call_guarded(
            "classifier",
            self.settings.enrichment_timeout,
            ErrorKind::Enrichment,
            async move { classifier.analyze(&input).await },
        )
        .await?;

        Ok(Enriched {
            description,
            assessment,
        })
    }
}

fn require_fields(title: &str, description: &str) -> AppResult<()> {
    if title.trim().is_empty() || description.trim().is_empty() {
        return Err(AppError::validation("Missing title or description"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::TimeZone;

    use noticeboard_database::MemoryNoticeStore;
    use noticeboard_entity::notice::NoticeStatus;

    use super::*;

    #[derive(Debug, Default)]
    struct EchoSummarizer {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Summarizer for EchoSummarizer {
        fn name(&self) -> &str {
            "echo"
        }

        async fn summarize(&self, text: &str) -> AppResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(text.to_string())
        }
    }

    #[derive(Debug)]
    struct BlankSummarizer;

    #[async_trait]
    impl Summarizer for BlankSummarizer {
        fn name(&self) -> &str {
            "blank"
        }

        async fn summarize(&self, _text: &str) -> AppResult<String> {
            Ok(String::new())
        }
    }

    #[derive(Debug)]
    struct FailingSummarizer;

    #[async_trait]
    impl Summarizer for FailingSummarizer {
        fn name(&self) -> &str {
            "failing"
        }

        async fn summarize(&self, _text: &str) -> AppResult<String> {
            Err(AppError::external_service("model offline"))
        }
    }

    #[derive(Debug)]
    struct FixedClassifier(PriorityAssessment);

    #[async_trait]
    impl PriorityClassifier for FixedClassifier {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn analyze(&self, _text: &str) -> AppResult<PriorityAssessment> {
            Ok(self.0.clone())
        }
    }

    #[derive(Debug)]
    struct PanickingClassifier;

    #[async_trait]
    impl PriorityClassifier for PanickingClassifier {
        fn name(&self) -> &str {
            "panicking"
        }

        async fn analyze(&self, _text: &str) -> AppResult<PriorityAssessment> {
            panic!("classifier bug");
        }
    }

    #[derive(Debug)]
    struct FixedOcr(&'static str);

    #[async_trait]
    impl OcrEngine for FixedOcr {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn extract_text(&self, image_path: &Path) -> AppResult<String> {
            assert!(image_path.exists(), "OCR must run on the saved file");
            Ok(self.0.to_string())
        }
    }

    fn next_friday() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 13, 23, 59, 59).unwrap()
    }

    fn high_next_friday() -> PriorityAssessment {
        PriorityAssessment {
            priority: Priority::High,
            deadline: Some(next_friday()),
        }
    }

    struct Harness {
        _dir: tempfile::TempDir,
        store: Arc<MemoryNoticeStore>,
        uploads: Arc<UploadStorage>,
    }

    impl Harness {
        async fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let uploads = Arc::new(UploadStorage::new(dir.path().join("uploads")).await.unwrap());
            Self {
                _dir: dir,
                store: Arc::new(MemoryNoticeStore::new()),
                uploads,
            }
        }

        fn service(
            &self,
            summarizer: Arc<dyn Summarizer>,
            classifier: Arc<dyn PriorityClassifier>,
            ocr: Arc<dyn OcrEngine>,
        ) -> IngestionService {
            IngestionService::new(
                self.store.clone(),
                summarizer,
                classifier,
                ocr,
                self.uploads.clone(),
                IngestionSettings::default(),
            )
        }

        fn default_service(&self, ocr_text: &'static str) -> IngestionService {
            self.service(
                Arc::new(EchoSummarizer::default()),
                Arc::new(FixedClassifier(high_next_friday())),
                Arc::new(FixedOcr(ocr_text)),
            )
        }
    }

    fn image(bytes: &'static [u8]) -> ImageUpload {
        ImageUpload {
            bytes: Some(Bytes::from_static(bytes)),
            filename: "board.jpg".to_string(),
            ..ImageUpload::default()
        }
    }

    #[tokio::test]
    async fn test_pay_rent_end_to_end() {
        let h = Harness::new().await;
        let service = h.default_service("");

        let created = service
            .create_from_fields("Pay rent", "Rent due next Friday, amount $1200", None)
            .await
            .unwrap();
        assert_eq!(created.priority, Priority::High);
        assert_eq!(created.deadline, Some(next_friday()));

        let stored = h.store.get(created.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "Pay rent");
        assert_eq!(stored.description, "Rent due next Friday, amount $1200");
        assert_eq!(stored.status, NoticeStatus::Pending);
        assert!(!stored.completed);
        assert!(stored.source.is_none());
    }

    #[tokio::test]
    async fn test_missing_fields_write_nothing() {
        let h = Harness::new().await;
        let summarizer = Arc::new(EchoSummarizer::default());
        let service = h.service(
            summarizer.clone(),
            Arc::new(FixedClassifier(PriorityAssessment::default())),
            Arc::new(FixedOcr("")),
        );

        for (title, description) in [("", "body"), ("title", ""), ("  ", "body")] {
            let err = service
                .create_from_fields(title, description, None)
                .await
                .unwrap_err();
            assert_eq!(err.kind, ErrorKind::Validation);
            assert_eq!(err.message, "Missing title or description");
        }
        assert!(h.store.is_empty().await);
        assert_eq!(summarizer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_summarizer_failure_is_enrichment_error() {
        let h = Harness::new().await;
        let service = h.service(
            Arc::new(FailingSummarizer),
            Arc::new(FixedClassifier(PriorityAssessment::default())),
            Arc::new(FixedOcr("")),
        );
        let err = service
            .create_from_fields("t", "d", None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Enrichment);
        assert!(h.store.is_empty().await);
    }

    #[tokio::test]
    async fn test_classifier_panic_is_contained() {
        let h = Harness::new().await;
        let service = h.service(
            Arc::new(EchoSummarizer::default()),
            Arc::new(PanickingClassifier),
            Arc::new(FixedOcr("")),
        );
        let err = service
            .create_from_fields("t", "d", None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Enrichment);
        assert!(h.store.is_empty().await);
    }

    #[tokio::test]
    async fn test_empty_summary_keeps_description() {
        let h = Harness::new().await;
        let service = h.service(
            Arc::new(BlankSummarizer),
            Arc::new(FixedClassifier(PriorityAssessment::default())),
            Arc::new(FixedOcr("")),
        );
        let created = service
            .create_from_fields("Notice", "Original body", Some("u1".to_string()))
            .await
            .unwrap();
        let stored = h.store.get(created.id).await.unwrap().unwrap();
        assert_eq!(stored.description, "Original body");
        assert_eq!(stored.user_id.as_deref(), Some("u1"));
    }

    #[tokio::test]
    async fn test_image_without_bytes_is_rejected() {
        let h = Harness::new().await;
        let service = h.default_service("Pay rent by Friday");

        let err = service
            .create_from_image(ImageUpload::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, "No image uploaded");

        let err = service.create_from_image(image(b"")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        assert!(h.uploads.list().await.unwrap().is_empty());
        assert!(h.store.is_empty().await);
    }

    #[tokio::test]
    async fn test_unreadable_image_is_extraction_error() {
        let h = Harness::new().await;
        let service = h.default_service("hi");

        let err = service.create_from_image(image(b"jpeg")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Extraction);
        assert_eq!(err.message, "OCR could not read text");
        assert!(h.store.is_empty().await);
        // The upload is kept for the retention sweep.
        assert_eq!(h.uploads.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_text_that_cleans_to_nothing_is_extraction_error() {
        let h = Harness::new().await;
        let service = h.default_service("| | |");
        let err = service.create_from_image(image(b"jpeg")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Extraction);
    }

    #[tokio::test]
    async fn test_image_notice_is_normalized_and_tagged() {
        let h = Harness::new().await;
        let service = h.default_service("  | Rent due \u{e2}\u{20ac}\u{201d} next Friday |  ");

        let created = service
            .create_from_image(ImageUpload {
                user_id: Some("u7".to_string()),
                ..image(b"jpeg")
            })
            .await
            .unwrap();
        assert_eq!(created.summary, "Rent due - next Friday");
        assert_eq!(created.priority, Priority::High);

        let stored = h.store.get(created.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "Image Notice");
        assert_eq!(stored.source, Some(NoticeSource::Ocr));
        assert_eq!(stored.user_id.as_deref(), Some("u7"));
    }

    #[tokio::test]
    async fn test_image_title_override() {
        let h = Harness::new().await;
        let service = h.default_service("Fire drill Thursday");
        let created = service
            .create_from_image(ImageUpload {
                title: Some("Drill".to_string()),
                ..image(b"png")
            })
            .await
            .unwrap();
        let stored = h.store.get(created.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "Drill");
    }

    #[tokio::test]
    async fn test_draft_duplicate_is_skipped() {
        let h = Harness::new().await;
        let service = h.default_service("");
        let draft = NoticeDraft::new("Lab closed", "The lab is closed today")
            .with_origin(NoticeSource::Email, "<msg-1@example.org>");

        let first = service.create_from_draft(draft.clone()).await.unwrap();
        assert!(matches!(first, DraftOutcome::Created(_)));

        let second = service.create_from_draft(draft).await.unwrap();
        assert_eq!(second, DraftOutcome::Duplicate);
        assert_eq!(h.store.len().await, 1);
    }

    #[tokio::test]
    async fn test_draft_deadline_hint_used_when_classifier_has_none() {
        let h = Harness::new().await;
        let service = h.service(
            Arc::new(EchoSummarizer::default()),
            Arc::new(FixedClassifier(PriorityAssessment::default())),
            Arc::new(FixedOcr("")),
        );
        let start = Utc.with_ymd_and_hms(2026, 4, 1, 10, 0, 0).unwrap();
        let draft = NoticeDraft::new("Standup", "Standup")
            .with_origin(NoticeSource::Calendar, "evt-1")
            .with_deadline_hint(Some(start));

        let outcome = service.create_from_draft(draft).await.unwrap();
        match outcome {
            DraftOutcome::Created(created) => assert_eq!(created.deadline, Some(start)),
            DraftOutcome::Duplicate => panic!("expected a new notice"),
        }
    }

    #[tokio::test]
    async fn test_concurrent_uploads_do_not_collide() {
        let h = Harness::new().await;
        let service = h.default_service("Bake sale on Friday");

        let mut handles = Vec::new();
        for _ in 0..10 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service.create_from_image(image(b"same-name")).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(h.uploads.list().await.unwrap().len(), 10);
        assert_eq!(h.store.len().await, 10);
    }
}
