use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::{info, instrument};

use crate::application::ports::RepositoryError;

#[instrument(skip(url))]
pub async fn create_pool(url: &str, max_connections: u32) -> Result<SqlitePool, RepositoryError> {
    let options = SqliteConnectOptions::from_str(url)
        .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

    info!("SQLite connection pool established");
    Ok(pool)
}

/// Creates the record tables if they do not exist. Safe to run on every
/// startup.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), RepositoryError> {
    let statements = [
        r#"
        CREATE TABLE IF NOT EXISTS sources (
            id          TEXT PRIMARY KEY,
            filename    TEXT NOT NULL,
            mime_type   TEXT NOT NULL,
            data        BLOB NOT NULL,
            created_at  TEXT NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS jobs (
            id             TEXT PRIMARY KEY,
            source_id      TEXT NOT NULL,
            status         TEXT NOT NULL,
            stage          INTEGER NOT NULL,
            error_message  TEXT,
            created_at     TEXT NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS notes (
            id          TEXT PRIMARY KEY,
            source_id   TEXT NOT NULL UNIQUE,
            content     TEXT NOT NULL,
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        )
        "#,
    ];

    for statement in statements {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
    }

    Ok(())
}
