mod env_credentials;
mod gemini_transformer;
mod mock_transformer;

pub use env_credentials::EnvCredentialProvider;
pub use gemini_transformer::{GeminiModels, GeminiTransformer};
pub use mock_transformer::MockTransformer;
