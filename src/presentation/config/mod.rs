mod settings;

pub use settings::{DatabaseSettings, GeminiSettings, QueueSettings, ServerSettings, Settings};
