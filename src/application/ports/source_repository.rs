use async_trait::async_trait;

use crate::domain::{SourceFile, SourceId};

use super::RepositoryError;

#[async_trait]
pub trait SourceRepository: Send + Sync {
    async fn save(&self, source: &SourceFile) -> Result<(), RepositoryError>;

    async fn get(&self, id: SourceId) -> Result<Option<SourceFile>, RepositoryError>;

    async fn delete(&self, id: SourceId) -> Result<(), RepositoryError>;
}
