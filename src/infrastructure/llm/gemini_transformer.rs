use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::application::ports::{NoteTransformer, TransformerError};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const STRUCTURE_PROMPT: &str = "You are an expert study tutor. Rewrite the attached lecture \
file into a comprehensive, well-structured Markdown study note. Use clear headers, keep all \
key information and terminology, and describe every figure in detail under a [Figure] label. \
Output the Markdown directly with no preamble.";

const ENRICH_PROMPT: &str = "Review the draft study note below together with the attached \
original lecture file. Enrich the note in place: add clinical correlations, mechanisms, \
mnemonics, and comparison tables where they help, without removing existing content. Return \
the complete updated Markdown directly with no preamble.";

const SYNTHESIZE_PROMPT: &str = "From the study note below and the attached original lecture \
file, produce a compact visual summary: concept maps and flow diagrams rendered as ASCII art \
with short captions. This summary will be placed above the full note. Output the Markdown \
directly with no preamble.";

/// Per-stage model selection. The heavier model runs the enrichment pass.
#[derive(Debug, Clone)]
pub struct GeminiModels {
    pub structure: String,
    pub enrich: String,
    pub synthesize: String,
}

impl Default for GeminiModels {
    fn default() -> Self {
        Self {
            structure: "gemini-2.0-flash".to_string(),
            enrich: "gemini-2.5-pro".to_string(),
            synthesize: "gemini-2.5-flash".to_string(),
        }
    }
}

/// Transformer backed by the Gemini generateContent REST API. The API
/// holds no context between calls, so the original document bytes are
/// re-attached inline on every stage.
pub struct GeminiTransformer {
    http: reqwest::Client,
    base_url: String,
    models: GeminiModels,
}

impl GeminiTransformer {
    pub fn new(models: GeminiModels) -> Self {
        Self::with_base_url(models, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(models: GeminiModels, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            models,
        }
    }

    async fn generate(
        &self,
        api_key: &str,
        model: &str,
        prompt: String,
        source: &[u8],
        mime_type: &str,
    ) -> Result<String, TransformerError> {
        let body = serde_json::json!({
            "contents": [{
                "parts": [
                    { "text": prompt },
                    { "inline_data": { "mime_type": mime_type, "data": BASE64.encode(source) } }
                ]
            }]
        });

        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, model);
        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| TransformerError::ApiRequestFailed(e.to_string()))?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(TransformerError::RateLimited);
        }
        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(TransformerError::ApiRequestFailed(format!(
                "{}: {}",
                status, detail
            )));
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| TransformerError::InvalidResponse(e.to_string()))?;

        payload
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| TransformerError::InvalidResponse("no candidate text".to_string()))
    }
}

#[async_trait]
impl NoteTransformer for GeminiTransformer {
    async fn structure(
        &self,
        api_key: &str,
        source: &[u8],
        mime_type: &str,
    ) -> Result<String, TransformerError> {
        self.generate(
            api_key,
            &self.models.structure,
            STRUCTURE_PROMPT.to_string(),
            source,
            mime_type,
        )
        .await
    }

    async fn enrich(
        &self,
        api_key: &str,
        draft: &str,
        source: &[u8],
        mime_type: &str,
    ) -> Result<String, TransformerError> {
        let prompt = format!("{}\n\nDraft note:\n{}", ENRICH_PROMPT, draft);
        self.generate(api_key, &self.models.enrich, prompt, source, mime_type)
            .await
    }

    async fn synthesize(
        &self,
        api_key: &str,
        draft: &str,
        source: &[u8],
        mime_type: &str,
    ) -> Result<String, TransformerError> {
        let prompt = format!("{}\n\nStudy note:\n{}", SYNTHESIZE_PROMPT, draft);
        self.generate(api_key, &self.models.synthesize, prompt, source, mime_type)
            .await
    }
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}
