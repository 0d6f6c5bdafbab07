use chrono::{DateTime, Utc};

use super::{JobId, JobStatus, SourceId, Stage};

/// One queued unit of work over exactly one source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: JobId,
    pub source_id: SourceId,
    pub status: JobStatus,
    pub stage: Stage,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Job {
    pub fn new(source_id: SourceId) -> Self {
        Self {
            id: JobId::new(),
            source_id,
            status: JobStatus::Pending,
            stage: Stage::NotStarted,
            error_message: None,
            created_at: Utc::now(),
        }
    }
}
