use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{NoteRepository, RepositoryError};
use crate::domain::{Note, NoteId, SourceId};

pub struct SqliteNoteRepository {
    pool: SqlitePool,
}

impl SqliteNoteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn note_from_row(row: &SqliteRow) -> Result<Note, RepositoryError> {
    let query_failed = |e: sqlx::Error| RepositoryError::QueryFailed(e.to_string());

    let raw_id: String = row.try_get("id").map_err(query_failed)?;
    let raw_source_id: String = row.try_get("source_id").map_err(query_failed)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(query_failed)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(query_failed)?;

    let id = Uuid::parse_str(&raw_id).map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
    let source_id = Uuid::parse_str(&raw_source_id)
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

    Ok(Note {
        id: NoteId::from_uuid(id),
        source_id: SourceId::from_uuid(source_id),
        content: row.try_get("content").map_err(query_failed)?,
        created_at,
        updated_at,
    })
}

#[async_trait]
impl NoteRepository for SqliteNoteRepository {
    #[instrument(skip(self, note), fields(note_id = %note.id, source_id = %note.source_id))]
    async fn upsert(&self, note: &Note) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO notes (id, source_id, content, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT(source_id) DO UPDATE
            SET content = excluded.content, updated_at = excluded.updated_at
            "#,
        )
        .bind(note.id.as_uuid().to_string())
        .bind(note.source_id.as_uuid().to_string())
        .bind(&note.content)
        .bind(note.created_at)
        .bind(note.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: NoteId) -> Result<Option<Note>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, source_id, content, created_at, updated_at
            FROM notes
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid().to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        row.as_ref().map(note_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn get_by_source(&self, source_id: SourceId) -> Result<Option<Note>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, source_id, content, created_at, updated_at
            FROM notes
            WHERE source_id = $1
            "#,
        )
        .bind(source_id.as_uuid().to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        row.as_ref().map(note_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<Note>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, source_id, content, created_at, updated_at
            FROM notes
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        rows.iter().map(note_from_row).collect()
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: NoteId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id.as_uuid().to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_by_source(&self, source_id: SourceId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM notes WHERE source_id = $1")
            .bind(source_id.as_uuid().to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }
}
