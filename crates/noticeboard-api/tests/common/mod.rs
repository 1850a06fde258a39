//! Shared helpers for the API tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use noticeboard_ai::{ExtractiveSummarizer, KeywordPriorityClassifier};
use noticeboard_api::{AppState, build_router};
use noticeboard_core::config::{AppConfig, FeedersConfig};
use noticeboard_core::result::AppResult;
use noticeboard_core::traits::OcrEngine;
use noticeboard_database::{MemoryNoticeStore, NoticeStore};
use noticeboard_service::{IngestionService, IngestionSettings, NoticeService};
use noticeboard_storage::UploadStorage;
use noticeboard_worker::FeederSupervisor;

pub const BOUNDARY: &str = "noticeboard-test-boundary";

/// OCR double that "reads" a fixed text from every image.
#[derive(Debug)]
pub struct FixedOcr(pub String);

#[async_trait]
impl OcrEngine for FixedOcr {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn extract_text(&self, _image_path: &Path) -> AppResult<String> {
        Ok(self.0.clone())
    }
}

/// Router over an in-memory store and a temporary upload directory.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryNoticeStore>,
    pub uploads: Arc<UploadStorage>,
    _dir: tempfile::TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_ocr_text("Library closed for maintenance on the weekend").await
    }

    pub async fn with_ocr_text(text: &str) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = Arc::new(MemoryNoticeStore::new());
        let uploads = Arc::new(
            UploadStorage::new(dir.path().join("uploads"))
                .await
                .expect("upload dir"),
        );
        let config = AppConfig::default();

        let ingestion = IngestionService::new(
            store.clone(),
            Arc::new(ExtractiveSummarizer::new(2, 300)),
            Arc::new(KeywordPriorityClassifier::new()),
            Arc::new(FixedOcr(text.to_string())),
            Arc::clone(&uploads),
            IngestionSettings::default(),
        );

        let state = AppState {
            config: Arc::new(config),
            store: store.clone() as Arc<dyn NoticeStore>,
            uploads: Arc::clone(&uploads),
            ingestion: Arc::new(ingestion),
            notices: Arc::new(NoticeService::new(store.clone())),
            feeders: Arc::new(FeederSupervisor::new(Vec::new(), &FeedersConfig::default())),
            started_at: Instant::now(),
        };

        Self {
            router: build_router(state),
            store,
            uploads,
            _dir: dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).expect("request"))
            .await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::delete(uri).body(Body::empty()).expect("request"))
            .await
    }

    pub async fn put(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::put(uri).body(Body::empty()).expect("request"))
            .await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("request"),
        )
        .await
    }

    pub async fn post_multipart(&self, uri: &str, body: Vec<u8>) -> (StatusCode, Value) {
        self.send(
            Request::post(uri)
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(body))
                .expect("request"),
        )
        .await
    }

    /// Create a notice and return its id.
    pub async fn create(&self, title: &str, description: &str, user_id: Option<&str>) -> String {
        let mut body = serde_json::json!({ "title": title, "description": description });
        if let Some(user) = user_id {
            body["user_id"] = Value::from(user);
        }
        let (status, body) = self.post_json("/api/notices", body).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_str().expect("id").to_string()
    }
}

/// Build a multipart body from text fields and an optional file part.
pub fn multipart(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, data)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}
