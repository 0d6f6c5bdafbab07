mod health;
mod notes;
mod queue;
mod upload;

pub use health::health_handler;
pub use notes::{delete_document_handler, get_note_handler, list_notes_handler};
pub use queue::{
    pause_queue_handler, purge_queue_handler, queue_snapshot_handler, retry_job_handler,
    start_queue_handler,
};
pub use upload::upload_handler;
