use crate::application::ports::CredentialProvider;

/// Reads the API key from the process environment on every lookup, so a
/// key exported after startup is picked up by the next job.
pub struct EnvCredentialProvider {
    var: String,
}

impl EnvCredentialProvider {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvCredentialProvider {
    fn default() -> Self {
        Self::new("GEMINI_API_KEY")
    }
}

impl CredentialProvider for EnvCredentialProvider {
    fn api_key(&self) -> Option<String> {
        std::env::var(&self.var).ok().filter(|v| !v.is_empty())
    }
}
