use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{JobRepository, RepositoryError};
use crate::domain::{Job, JobId, JobStatus, SourceId, Stage};

pub struct SqliteJobRepository {
    pool: SqlitePool,
}

impl SqliteJobRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn job_from_row(row: &SqliteRow) -> Result<Job, RepositoryError> {
    let query_failed = |e: sqlx::Error| RepositoryError::QueryFailed(e.to_string());

    let raw_id: String = row.try_get("id").map_err(query_failed)?;
    let raw_source_id: String = row.try_get("source_id").map_err(query_failed)?;
    let raw_status: String = row.try_get("status").map_err(query_failed)?;
    let raw_stage: i64 = row.try_get("stage").map_err(query_failed)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(query_failed)?;

    let id = Uuid::parse_str(&raw_id).map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
    let source_id = Uuid::parse_str(&raw_source_id)
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
    let status = raw_status
        .parse::<JobStatus>()
        .map_err(RepositoryError::QueryFailed)?;
    let stage = u8::try_from(raw_stage)
        .ok()
        .and_then(Stage::from_u8)
        .ok_or_else(|| RepositoryError::QueryFailed(format!("invalid stage: {}", raw_stage)))?;

    Ok(Job {
        id: JobId::from_uuid(id),
        source_id: SourceId::from_uuid(source_id),
        status,
        stage,
        error_message: row.try_get("error_message").map_err(query_failed)?,
        created_at,
    })
}

#[async_trait]
impl JobRepository for SqliteJobRepository {
    #[instrument(skip(self, job), fields(job_id = %job.id))]
    async fn create(&self, job: &Job) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO jobs (id, source_id, status, stage, error_message, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(job.id.as_uuid().to_string())
        .bind(job.source_id.as_uuid().to_string())
        .bind(job.status.as_str())
        .bind(job.stage.as_u8() as i64)
        .bind(&job.error_message)
        .bind(job.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, source_id, status, stage, error_message, created_at
            FROM jobs
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid().to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        row.as_ref().map(job_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<Job>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, source_id, status, stage, error_message, created_at
            FROM jobs
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        rows.iter().map(job_from_row).collect()
    }

    #[instrument(skip(self, error_message), fields(job_id = %id, status = %status, stage = %stage))]
    async fn update_progress(
        &self,
        id: JobId,
        status: JobStatus,
        stage: Stage,
        error_message: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE jobs
            SET status = $1, stage = $2, error_message = $3
            WHERE id = $4
            "#,
        )
        .bind(status.as_str())
        .bind(stage.as_u8() as i64)
        .bind(error_message)
        .bind(id.as_uuid().to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("job {}", id)));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: JobId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id.as_uuid().to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_by_source(&self, source_id: SourceId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM jobs WHERE source_id = $1")
            .bind(source_id.as_uuid().to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }
}
