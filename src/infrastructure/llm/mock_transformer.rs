use async_trait::async_trait;

use crate::application::ports::{NoteTransformer, TransformerError};

/// Canned transformer for tests and local development without an API key.
pub struct MockTransformer;

#[async_trait]
impl NoteTransformer for MockTransformer {
    async fn structure(
        &self,
        _api_key: &str,
        source: &[u8],
        mime_type: &str,
    ) -> Result<String, TransformerError> {
        Ok(format!(
            "# Structured note\n\n({} bytes of {})",
            source.len(),
            mime_type
        ))
    }

    async fn enrich(
        &self,
        _api_key: &str,
        draft: &str,
        _source: &[u8],
        _mime_type: &str,
    ) -> Result<String, TransformerError> {
        Ok(format!("{}\n\n> Enrichment added.", draft))
    }

    async fn synthesize(
        &self,
        _api_key: &str,
        _draft: &str,
        _source: &[u8],
        _mime_type: &str,
    ) -> Result<String, TransformerError> {
        Ok("```\n[ concept map ]\n```".to_string())
    }
}
