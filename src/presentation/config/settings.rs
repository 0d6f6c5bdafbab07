use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub gemini: GeminiSettings,
    pub queue: QueueSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSettings {
    /// Environment variable holding the API key; the key itself is
    /// resolved per job, not captured at startup.
    pub api_key_var: String,
    pub structure_model: String,
    pub enrich_model: String,
    pub synthesize_model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueueSettings {
    pub stage_cooldown_secs: u32,
    pub job_cooldown_secs: u32,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            server: ServerSettings {
                host: env_or("SERVER_HOST", "0.0.0.0"),
                port: env_parsed("SERVER_PORT", 3000),
            },
            database: DatabaseSettings {
                url: env_or("DATABASE_URL", "sqlite://lembar.db"),
                max_connections: env_parsed("DATABASE_MAX_CONNECTIONS", 5),
            },
            gemini: GeminiSettings {
                api_key_var: env_or("GEMINI_API_KEY_VAR", "GEMINI_API_KEY"),
                structure_model: env_or("GEMINI_STRUCTURE_MODEL", "gemini-2.0-flash"),
                enrich_model: env_or("GEMINI_ENRICH_MODEL", "gemini-2.5-pro"),
                synthesize_model: env_or("GEMINI_SYNTHESIZE_MODEL", "gemini-2.5-flash"),
            },
            queue: QueueSettings {
                stage_cooldown_secs: env_parsed("QUEUE_STAGE_COOLDOWN_SECS", 10),
                job_cooldown_secs: env_parsed("QUEUE_JOB_COOLDOWN_SECS", 30),
            },
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
