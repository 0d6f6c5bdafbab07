use chrono::{DateTime, Utc};

use super::{NoteId, SourceId};

/// The generated study note for one source file. Regenerating a note for
/// the same source updates the content in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub id: NoteId,
    pub source_id: SourceId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    pub fn new(source_id: SourceId, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: NoteId::new(),
            source_id,
            content,
            created_at: now,
            updated_at: now,
        }
    }
}
