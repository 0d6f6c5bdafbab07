use std::sync::Arc;

use crate::application::ports::{JobRepository, NoteRepository, SourceRepository};
use crate::application::services::QueueEngine;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<QueueEngine>,
    pub sources: Arc<dyn SourceRepository>,
    pub jobs: Arc<dyn JobRepository>,
    pub notes: Arc<dyn NoteRepository>,
}
