use async_trait::async_trait;

use crate::domain::{Job, JobId, JobStatus, SourceId, Stage};

use super::RepositoryError;

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create(&self, job: &Job) -> Result<(), RepositoryError>;

    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError>;

    /// All jobs, ordered by submission time (oldest first). The queue
    /// engine rebuilds its in-memory view from this at startup.
    async fn list_all(&self) -> Result<Vec<Job>, RepositoryError>;

    /// Persists status, stage, and error message together so no reader
    /// can observe a status without its matching stage.
    async fn update_progress(
        &self,
        id: JobId,
        status: JobStatus,
        stage: Stage,
        error_message: Option<&str>,
    ) -> Result<(), RepositoryError>;

    async fn delete(&self, id: JobId) -> Result<(), RepositoryError>;

    async fn delete_by_source(&self, source_id: SourceId) -> Result<(), RepositoryError>;
}
