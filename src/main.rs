use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use lembar::application::services::{CooldownConfig, QueueEngine};
use lembar::infrastructure::llm::{EnvCredentialProvider, GeminiModels, GeminiTransformer};
use lembar::infrastructure::observability::{TracingConfig, init_tracing};
use lembar::infrastructure::persistence::{
    SqliteJobRepository, SqliteNoteRepository, SqliteSourceRepository, create_pool, init_schema,
};
use lembar::presentation::{AppState, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env();
    init_tracing(TracingConfig::default());

    let pool = create_pool(&settings.database.url, settings.database.max_connections).await?;
    init_schema(&pool).await?;

    let sources = Arc::new(SqliteSourceRepository::new(pool.clone()));
    let jobs = Arc::new(SqliteJobRepository::new(pool.clone()));
    let notes = Arc::new(SqliteNoteRepository::new(pool));

    let transformer = Arc::new(GeminiTransformer::new(GeminiModels {
        structure: settings.gemini.structure_model.clone(),
        enrich: settings.gemini.enrich_model.clone(),
        synthesize: settings.gemini.synthesize_model.clone(),
    }));
    let credentials = Arc::new(EnvCredentialProvider::new(
        settings.gemini.api_key_var.clone(),
    ));

    let engine = Arc::new(QueueEngine::new(
        sources.clone(),
        jobs.clone(),
        notes.clone(),
        transformer,
        credentials,
        CooldownConfig {
            stage_cooldown: settings.queue.stage_cooldown_secs,
            job_cooldown: settings.queue.job_cooldown_secs,
            tick: Duration::from_secs(1),
        },
    ));
    engine.restore().await?;
    tokio::spawn(Arc::clone(&engine).run());

    let state = AppState {
        engine,
        sources,
        jobs,
        notes,
    };
    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
