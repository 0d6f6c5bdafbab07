use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{RepositoryError, SourceRepository};
use crate::domain::{SourceFile, SourceId};

pub struct SqliteSourceRepository {
    pool: SqlitePool,
}

impl SqliteSourceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SourceRepository for SqliteSourceRepository {
    #[instrument(skip(self, source), fields(source_id = %source.id))]
    async fn save(&self, source: &SourceFile) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO sources (id, filename, mime_type, data, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(source.id.as_uuid().to_string())
        .bind(&source.filename)
        .bind(&source.mime_type)
        .bind(&source.data)
        .bind(source.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get(&self, id: SourceId) -> Result<Option<SourceFile>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, filename, mime_type, data, created_at
            FROM sources
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid().to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        match row {
            Some(r) => {
                let raw_id: String = r
                    .try_get("id")
                    .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
                let uuid = Uuid::parse_str(&raw_id)
                    .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
                let created_at: DateTime<Utc> = r
                    .try_get("created_at")
                    .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

                Ok(Some(SourceFile {
                    id: SourceId::from_uuid(uuid),
                    filename: r
                        .try_get("filename")
                        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?,
                    mime_type: r
                        .try_get("mime_type")
                        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?,
                    data: r
                        .try_get("data")
                        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?,
                    created_at,
                }))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: SourceId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM sources WHERE id = $1")
            .bind(id.as_uuid().to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }
}
