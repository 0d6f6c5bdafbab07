use async_trait::async_trait;

/// Three-stage note transformation service. The service keeps no context
/// between calls, so stages 2 and 3 receive the original source bytes
/// again alongside the previous stage's text.
#[async_trait]
pub trait NoteTransformer: Send + Sync {
    /// Stage 1: rewrite the raw document into a structured base note.
    async fn structure(
        &self,
        api_key: &str,
        source: &[u8],
        mime_type: &str,
    ) -> Result<String, TransformerError>;

    /// Stage 2: enrich the base note with deeper explanations.
    async fn enrich(
        &self,
        api_key: &str,
        draft: &str,
        source: &[u8],
        mime_type: &str,
    ) -> Result<String, TransformerError>;

    /// Stage 3: produce the visual summary that precedes the note.
    async fn synthesize(
        &self,
        api_key: &str,
        draft: &str,
        source: &[u8],
        mime_type: &str,
    ) -> Result<String, TransformerError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TransformerError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("rate limited")]
    RateLimited,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
