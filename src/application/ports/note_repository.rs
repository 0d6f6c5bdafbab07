use async_trait::async_trait;

use crate::domain::{Note, NoteId, SourceId};

use super::RepositoryError;

#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Inserts the note, or replaces the content of an existing note for
    /// the same source (regeneration updates in place).
    async fn upsert(&self, note: &Note) -> Result<(), RepositoryError>;

    async fn get_by_id(&self, id: NoteId) -> Result<Option<Note>, RepositoryError>;

    async fn get_by_source(&self, source_id: SourceId) -> Result<Option<Note>, RepositoryError>;

    async fn list_all(&self) -> Result<Vec<Note>, RepositoryError>;

    async fn delete(&self, id: NoteId) -> Result<(), RepositoryError>;

    async fn delete_by_source(&self, source_id: SourceId) -> Result<(), RepositoryError>;
}
