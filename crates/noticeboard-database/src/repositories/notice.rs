//! Notice repository backed by PostgreSQL.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use noticeboard_core::error::{AppError, ErrorKind};
use noticeboard_core::result::AppResult;
use noticeboard_core::types::{NoticeId, Priority};
use noticeboard_entity::notice::{CompleteOutcome, NewNotice, Notice, NoticeSource, NoticeStatus};

use crate::store::NoticeStore;

const SELECT_COLUMNS: &str = "id, title, description, priority, deadline, user_id, status, \
     completed, completed_date, created_at, source, external_ref";

/// Unique-violation SQLSTATE.
const UNIQUE_VIOLATION: &str = "23505";

/// Raw `notices` row. Enum columns are stored as text.
#[derive(Debug, sqlx::FromRow)]
struct NoticeRow {
    id: Uuid,
    title: String,
    description: String,
    priority: String,
    deadline: Option<DateTime<Utc>>,
    user_id: Option<String>,
    status: String,
    completed: bool,
    completed_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    source: Option<String>,
    external_ref: Option<String>,
}

impl TryFrom<NoticeRow> for Notice {
    type Error = AppError;

    fn try_from(row: NoticeRow) -> Result<Self, Self::Error> {
        let corrupt = |field: &str, e: String| {
            AppError::database(format!("Corrupt notice row {}: {field}: {e}", row.id))
        };
        let priority: Priority = row.priority.parse().map_err(|e| corrupt("priority", e))?;
        let status: NoticeStatus = row.status.parse().map_err(|e| corrupt("status", e))?;
        let source = row
            .source
            .as_deref()
            .map(str::parse::<NoticeSource>)
            .transpose()
            .map_err(|e| corrupt("source", e))?;

        Ok(Notice {
            id: NoticeId::from_uuid(row.id),
            title: row.title,
            description: row.description,
            priority,
            deadline: row.deadline,
            user_id: row.user_id,
            status,
            completed: row.completed,
            completed_date: row.completed_date,
            created_at: row.created_at,
            source,
            external_ref: row.external_ref,
        })
    }
}

/// Repository for notice CRUD operations.
#[derive(Debug, Clone)]
pub struct PgNoticeRepository {
    pool: PgPool,
}

impl PgNoticeRepository {
    /// Create a new notice repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_insert_error(e: sqlx::Error) -> AppError {
    let duplicate = e
        .as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == UNIQUE_VIOLATION);
    if duplicate {
        AppError::with_source(
            ErrorKind::Conflict,
            "A notice from this origin already exists",
            e,
        )
    } else {
        AppError::with_source(ErrorKind::Database, "Failed to insert notice", e)
    }
}

#[async_trait]
impl NoticeStore for PgNoticeRepository {
    async fn insert(&self, notice: NewNotice) -> AppResult<Notice> {
        let sql = format!(
            "INSERT INTO notices (id, title, description, priority, deadline, user_id, source, external_ref) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {SELECT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, NoticeRow>(&sql)
            .bind(NoticeId::new().into_uuid())
            .bind(&notice.title)
            .bind(&notice.description)
            .bind(notice.priority.as_str())
            .bind(notice.deadline)
            .bind(&notice.user_id)
            .bind(notice.source.map(|s| s.as_str()))
            .bind(&notice.external_ref)
            .fetch_one(&self.pool)
            .await
            .map_err(map_insert_error)?;
        row.try_into()
    }

    async fn list_visible(&self, viewer: Option<&str>) -> AppResult<Vec<Notice>> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM notices \
             WHERE $1::text IS NULL OR user_id = $1 OR user_id IS NULL \
             ORDER BY created_at ASC, id ASC"
        );
        let rows = sqlx::query_as::<_, NoticeRow>(&sql)
            .bind(viewer)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list notices", e))?;
        rows.into_iter().map(Notice::try_from).collect()
    }

    async fn get(&self, id: NoticeId) -> AppResult<Option<Notice>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM notices WHERE id = $1");
        sqlx::query_as::<_, NoticeRow>(&sql)
            .bind(id.into_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find notice", e))?
            .map(Notice::try_from)
            .transpose()
    }

    async fn delete(&self, id: NoticeId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM notices WHERE id = $1")
            .bind(id.into_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete notice", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn complete(&self, id: NoticeId, on: NaiveDate) -> AppResult<CompleteOutcome> {
        let result = sqlx::query(
            "UPDATE notices SET status = 'completed', completed = TRUE, completed_date = $2 \
             WHERE id = $1 AND status = 'pending'",
        )
        .bind(id.into_uuid())
        .bind(on)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to complete notice", e))?;

        if result.rows_affected() > 0 {
            return Ok(CompleteOutcome::Completed);
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM notices WHERE id = $1)")
            .bind(id.into_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find notice", e))?;

        Ok(if exists {
            CompleteOutcome::AlreadyCompleted
        } else {
            CompleteOutcome::NotFound
        })
    }

    async fn find_by_external_ref(
        &self,
        source: NoticeSource,
        external_ref: &str,
    ) -> AppResult<Option<Notice>> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM notices WHERE source = $1 AND external_ref = $2"
        );
        sqlx::query_as::<_, NoticeRow>(&sql)
            .bind(source.as_str())
            .bind(external_ref)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find notice by origin", e)
            })?
            .map(Notice::try_from)
            .transpose()
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> NoticeRow {
        NoticeRow {
            id: Uuid::now_v7(),
            title: "Pay rent".to_string(),
            description: "Rent due".to_string(),
            priority: "High".to_string(),
            deadline: None,
            user_id: Some("u1".to_string()),
            status: "completed".to_string(),
            completed: true,
            completed_date: NaiveDate::from_ymd_opt(2026, 1, 2),
            created_at: Utc::now(),
            source: Some("EMAIL".to_string()),
            external_ref: Some("msg-1".to_string()),
        }
    }

    #[test]
    fn test_row_converts_to_notice() {
        let notice = Notice::try_from(row()).unwrap();
        assert_eq!(notice.priority, Priority::High);
        assert_eq!(notice.status, NoticeStatus::Completed);
        assert_eq!(notice.source, Some(NoticeSource::Email));
        assert!(notice.is_consistent());
    }

    #[test]
    fn test_row_with_unknown_priority_is_rejected() {
        let mut bad = row();
        bad.priority = "Urgent".to_string();
        let err = Notice::try_from(bad).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Database);
    }
}
