mod memory_repositories;
mod sqlite_job_repository;
mod sqlite_note_repository;
mod sqlite_pool;
mod sqlite_source_repository;

pub use memory_repositories::{MemoryJobRepository, MemoryNoteRepository, MemorySourceRepository};
pub use sqlite_job_repository::SqliteJobRepository;
pub use sqlite_note_repository::SqliteNoteRepository;
pub use sqlite_pool::{create_pool, init_schema};
pub use sqlite_source_repository::SqliteSourceRepository;
