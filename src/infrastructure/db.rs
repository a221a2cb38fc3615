//! PostgreSQL connection pooling and schema setup

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::domain::DomainError;

/// Open a connection pool using the configured limits
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DomainError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(std::time::Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(std::time::Duration::from_secs(config.idle_timeout_secs))
        .connect(&config.url)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))?;

    Ok(pool)
}

/// Create the schema if it does not exist yet
pub async fn run_migrations(pool: &PgPool) -> Result<(), DomainError> {
    info!("Running database migrations");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            name TEXT,
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| DomainError::storage(format!("Failed to create users table: {}", e)))?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS api_keys (
            id UUID PRIMARY KEY,
            user_id UUID REFERENCES users(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            value TEXT NOT NULL,
            usage BIGINT NOT NULL DEFAULT 0,
            limit_count BIGINT NOT NULL DEFAULT 1000,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| DomainError::storage(format!("Failed to create api_keys table: {}", e)))?;

    sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS api_keys_value_idx ON api_keys (value)")
        .execute(pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create value index: {}", e)))?;

    Ok(())
}
