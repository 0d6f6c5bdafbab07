//! In-memory repository implementations. They honor the same contracts
//! as the SQLite adapters (submission ordering, upsert-by-source) and
//! back the integration tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::application::ports::{
    JobRepository, NoteRepository, RepositoryError, SourceRepository,
};
use crate::domain::{Job, JobId, JobStatus, Note, NoteId, SourceFile, SourceId, Stage};

#[derive(Default)]
pub struct MemorySourceRepository {
    sources: Mutex<HashMap<SourceId, SourceFile>>,
}

impl MemorySourceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SourceRepository for MemorySourceRepository {
    async fn save(&self, source: &SourceFile) -> Result<(), RepositoryError> {
        self.sources.lock().await.insert(source.id, source.clone());
        Ok(())
    }

    async fn get(&self, id: SourceId) -> Result<Option<SourceFile>, RepositoryError> {
        Ok(self.sources.lock().await.get(&id).cloned())
    }

    async fn delete(&self, id: SourceId) -> Result<(), RepositoryError> {
        self.sources.lock().await.remove(&id);
        Ok(())
    }
}

/// Jobs kept in insertion order, matching the `ORDER BY created_at`
/// contract of the SQLite adapter.
#[derive(Default)]
pub struct MemoryJobRepository {
    jobs: Mutex<Vec<Job>>,
}

impl MemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a record directly, bypassing the engine. Used by recovery
    /// tests to simulate state left behind by a crashed process.
    pub async fn seed(&self, job: Job) {
        self.jobs.lock().await.push(job);
    }
}

#[async_trait]
impl JobRepository for MemoryJobRepository {
    async fn create(&self, job: &Job) -> Result<(), RepositoryError> {
        self.jobs.lock().await.push(job.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        Ok(self.jobs.lock().await.iter().find(|j| j.id == id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Job>, RepositoryError> {
        Ok(self.jobs.lock().await.clone())
    }

    async fn update_progress(
        &self,
        id: JobId,
        status: JobStatus,
        stage: Stage,
        error_message: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.lock().await;
        let job = jobs
            .iter_mut()
            .find(|j| j.id == id)
            .ok_or_else(|| RepositoryError::NotFound(format!("job {}", id)))?;
        job.status = status;
        job.stage = stage;
        job.error_message = error_message.map(str::to_string);
        Ok(())
    }

    async fn delete(&self, id: JobId) -> Result<(), RepositoryError> {
        self.jobs.lock().await.retain(|j| j.id != id);
        Ok(())
    }

    async fn delete_by_source(&self, source_id: SourceId) -> Result<(), RepositoryError> {
        self.jobs.lock().await.retain(|j| j.source_id != source_id);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryNoteRepository {
    notes: Mutex<Vec<Note>>,
}

impl MemoryNoteRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NoteRepository for MemoryNoteRepository {
    async fn upsert(&self, note: &Note) -> Result<(), RepositoryError> {
        let mut notes = self.notes.lock().await;
        match notes.iter_mut().find(|n| n.source_id == note.source_id) {
            Some(existing) => {
                existing.content = note.content.clone();
                existing.updated_at = Utc::now();
            }
            None => notes.push(note.clone()),
        }
        Ok(())
    }

    async fn get_by_id(&self, id: NoteId) -> Result<Option<Note>, RepositoryError> {
        Ok(self.notes.lock().await.iter().find(|n| n.id == id).cloned())
    }

    async fn get_by_source(&self, source_id: SourceId) -> Result<Option<Note>, RepositoryError> {
        Ok(self
            .notes
            .lock()
            .await
            .iter()
            .find(|n| n.source_id == source_id)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<Note>, RepositoryError> {
        Ok(self.notes.lock().await.clone())
    }

    async fn delete(&self, id: NoteId) -> Result<(), RepositoryError> {
        self.notes.lock().await.retain(|n| n.id != id);
        Ok(())
    }

    async fn delete_by_source(&self, source_id: SourceId) -> Result<(), RepositoryError> {
        self.notes.lock().await.retain(|n| n.source_id != source_id);
        Ok(())
    }
}
