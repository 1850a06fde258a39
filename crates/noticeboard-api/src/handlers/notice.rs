//! Notice handlers.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use bytes::Bytes;

use noticeboard_core::error::AppError;
use noticeboard_core::types::NoticeId;
use noticeboard_entity::notice::CompleteOutcome;
use noticeboard_service::ImageUpload;

use crate::dto::request::{CreateNoticeRequest, ListNoticesQuery};
use crate::dto::response::{
    CreatedResponse, ImageCreatedResponse, MessageResponse, NoticeResponse,
};
use crate::error::ApiError;
use crate::state::AppState;

const NOT_FOUND: &str = "Notice not found";

/// Unparsable ids can never match a notice.
fn parse_id(raw: &str) -> Result<NoticeId, ApiError> {
    raw.parse::<NoticeId>()
        .map_err(|_| ApiError(AppError::not_found(NOT_FOUND)))
}

/// POST /api/notices
pub async fn create_notice(
    State(state): State<AppState>,
    body: Result<Json<CreateNoticeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let Json(req) = body.map_err(|e| {
        tracing::debug!(error = %e, "Rejected notice body");
        AppError::validation("Missing title or description")
    })?;

    let created = state
        .ingestion
        .create_from_fields(
            req.title.as_deref().unwrap_or_default(),
            req.description.as_deref().unwrap_or_default(),
            req.user_id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// GET /api/notices?user_id=
pub async fn list_notices(
    State(state): State<AppState>,
    Query(query): Query<ListNoticesQuery>,
) -> Result<Json<Vec<NoticeResponse>>, ApiError> {
    let notices = state.notices.list(query.user_id.as_deref()).await?;
    Ok(Json(notices.into_iter().map(NoticeResponse::from).collect()))
}

/// GET /api/notices/{id}
pub async fn get_notice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<NoticeResponse>, ApiError> {
    let notice = state.notices.get(parse_id(&id)?).await?;
    Ok(Json(notice.into()))
}

/// DELETE /api/notices/{id}
pub async fn delete_notice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    if state.notices.remove(parse_id(&id)?).await? {
        Ok(Json(MessageResponse::new("Notice deleted")))
    } else {
        Err(AppError::not_found(NOT_FOUND).into())
    }
}

/// PUT /api/notices/{id}/complete
pub async fn complete_notice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    match state.notices.complete(parse_id(&id)?).await? {
        CompleteOutcome::Completed => Ok(Json(MessageResponse::new("Notice marked as completed"))),
        CompleteOutcome::AlreadyCompleted => {
            Err(AppError::conflict("Notice already completed").into())
        }
        CompleteOutcome::NotFound => Err(AppError::not_found(NOT_FOUND).into()),
    }
}

/// POST /api/notices/from-image (multipart: `image`, `user_id`, `title`)
pub async fn create_from_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ImageCreatedResponse>), ApiError> {
    let mut upload = ImageUpload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "image" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let data: Bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?;
                // Browsers send an empty part for an untouched file input.
                if !(filename.is_empty() && data.is_empty()) {
                    upload.filename = filename;
                    upload.bytes = Some(data);
                }
            }
            "user_id" | "title" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?;
                if name == "user_id" {
                    upload.user_id = Some(text);
                } else {
                    upload.title = Some(text);
                }
            }
            _ => {}
        }
    }

    let created = state.ingestion.create_from_image(upload).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}
