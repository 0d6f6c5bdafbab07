mod ids;
mod job;
mod job_status;
mod note;
mod source;
mod stage;

pub use ids::{JobId, NoteId, SourceId};
pub use job::Job;
pub use job_status::JobStatus;
pub use note::Note;
pub use source::SourceFile;
pub use stage::Stage;
