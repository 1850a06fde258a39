//! Notice endpoint tests.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::json;

use common::{TestApp, multipart};

#[tokio::test]
async fn test_create_notice_returns_created() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post_json(
            "/api/notices",
            json!({ "title": "Water outage", "description": "Urgent: water is off in block B." }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Notice created successfully");
    assert_eq!(body["priority"], "Critical");
    assert!(body["id"].is_string());
    assert!(body["deadline"].is_null());
    assert_eq!(app.store.len().await, 1);
}

#[tokio::test]
async fn test_create_notice_missing_field_is_bad_request() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post_json("/api/notices", json!({ "title": "No body" }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing title or description");
    assert_eq!(body["code"], "VALIDATION");
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_create_notice_malformed_json_is_bad_request() {
    let app = TestApp::new().await;

    let request = Request::post("/api/notices")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION");
}

#[tokio::test]
async fn test_list_applies_visibility() {
    let app = TestApp::new().await;
    app.create("Shared", "Library closed for maintenance", None).await;
    app.create("Mine", "Library closed for maintenance", Some("u1")).await;
    app.create("Theirs", "Library closed for maintenance", Some("u2")).await;

    let (status, body) = app.get("/api/notices?user_id=u1").await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Shared", "Mine"]);

    let (_, all) = app.get("/api/notices").await;
    assert_eq!(all.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_get_notice_uses_original_field_names() {
    let app = TestApp::new().await;
    let id = app.create("Shared", "Library closed for maintenance", None).await;

    let (status, body) = app.get(&format!("/api/notices/{id}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["_id"], id);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["completed"], false);
    assert!(body["completedDate"].is_null());
    assert_eq!(body["priority"], "Low");
}

#[tokio::test]
async fn test_malformed_id_is_not_found() {
    let app = TestApp::new().await;

    for (status, body) in [
        app.get("/api/notices/not-an-id").await,
        app.delete("/api/notices/not-an-id").await,
        app.put("/api/notices/not-an-id/complete").await,
    ] {
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Notice not found");
    }
}

#[tokio::test]
async fn test_delete_twice() {
    let app = TestApp::new().await;
    let id = app.create("Shared", "Library closed for maintenance", None).await;

    let (status, body) = app.delete(&format!("/api/notices/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Notice deleted");

    let (status, body) = app.delete(&format!("/api/notices/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Notice not found");
}

#[tokio::test]
async fn test_complete_then_conflict() {
    let app = TestApp::new().await;
    let id = app.create("Shared", "Library closed for maintenance", None).await;
    let uri = format!("/api/notices/{id}/complete");

    let (status, body) = app.put(&uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Notice marked as completed");

    let (status, body) = app.put(&uri).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let (_, notice) = app.get(&format!("/api/notices/{id}")).await;
    assert_eq!(notice["status"], "completed");
    assert_eq!(notice["completed"], true);
    assert!(notice["completedDate"].is_string());
}

#[tokio::test]
async fn test_complete_unknown_is_not_found() {
    let app = TestApp::new().await;

    let (status, _) = app
        .put("/api/notices/0190b2a4-6c1e-7c3a-9f1e-2b5d8c7a4e10/complete")
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_from_image() {
    let app = TestApp::with_ocr_text("Exam | schedule posted for all students").await;

    let body = multipart(&[("user_id", "u1")], Some(("board.png", b"\x89PNG fake")));
    let (status, body) = app.post_multipart("/api/notices/from-image", body).await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["message"], "Notice created from image");
    assert_eq!(body["summary"], "Exam schedule posted for all students");
    assert_eq!(body["priority"], "High");

    let (_, notice) = app.get(&format!("/api/notices/{}", body["id"].as_str().unwrap())).await;
    assert_eq!(notice["title"], "Image Notice");
    assert_eq!(notice["source"], "OCR");
    assert_eq!(notice["user_id"], "u1");
    assert_eq!(app.uploads.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_from_image_without_image() {
    let app = TestApp::new().await;

    let body = multipart(&[("user_id", "u1")], None);
    let (status, body) = app.post_multipart("/api/notices/from-image", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No image uploaded");
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_create_from_unreadable_image() {
    let app = TestApp::with_ocr_text(" | ").await;

    let body = multipart(&[], Some(("blank.png", b"\x89PNG fake")));
    let (status, body) = app.post_multipart("/api/notices/from-image", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "OCR could not read text");
    assert_eq!(body["code"], "EXTRACTION");
    assert!(app.store.is_empty().await);
}
