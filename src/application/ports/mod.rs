mod credentials;
mod job_repository;
mod note_repository;
mod repository_error;
mod source_repository;
mod transformer;

pub use credentials::CredentialProvider;
pub use job_repository::JobRepository;
pub use note_repository::NoteRepository;
pub use repository_error::RepositoryError;
pub use source_repository::SourceRepository;
pub use transformer::{NoteTransformer, TransformerError};
