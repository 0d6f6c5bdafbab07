use chrono::{DateTime, Utc};

use super::SourceId;

/// An uploaded document, stored verbatim so every pipeline stage can
/// re-send the original bytes to the transformation service.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub id: SourceId,
    pub filename: String,
    pub mime_type: String,
    pub data: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

impl SourceFile {
    pub fn new(filename: String, mime_type: String, data: Vec<u8>) -> Self {
        Self {
            id: SourceId::new(),
            filename,
            mime_type,
            data,
            created_at: Utc::now(),
        }
    }

    pub fn size_bytes(&self) -> u64 {
        self.data.len() as u64
    }
}
