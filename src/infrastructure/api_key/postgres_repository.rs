//! PostgreSQL API key repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::api_key::{ApiKey, ApiKeyRepository};
use crate::domain::DomainError;

const COLUMNS: &str = "id, user_id, name, value, usage, limit_count, created_at, updated_at";

/// PostgreSQL implementation of ApiKeyRepository
#[derive(Debug, Clone)]
pub struct PostgresApiKeyRepository {
    pool: PgPool,
}

impl PostgresApiKeyRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApiKeyRepository for PostgresApiKeyRepository {
    async fn get(&self, id: Uuid) -> Result<Option<ApiKey>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM api_keys WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get API key: {e}")))?;

        row.map(|r| row_to_api_key(&r)).transpose()
    }

    async fn get_by_value(&self, value: &str) -> Result<Option<ApiKey>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM api_keys WHERE value = $1"
        ))
        .bind(value)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get API key by value: {e}")))?;

        row.map(|r| row_to_api_key(&r)).transpose()
    }

    async fn create(&self, api_key: ApiKey) -> Result<ApiKey, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO api_keys (id, user_id, name, value, usage, limit_count, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(api_key.id())
        .bind(api_key.user_id())
        .bind(api_key.name())
        .bind(api_key.value())
        .bind(api_key.usage())
        .bind(api_key.limit_count())
        .bind(api_key.created_at())
        .bind(api_key.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                DomainError::conflict(format!(
                    "API key value '{}' already exists",
                    api_key.value()
                ))
            } else {
                DomainError::storage(format!("Failed to create API key: {e}"))
            }
        })?;

        Ok(api_key)
    }

    async fn update(&self, api_key: &ApiKey) -> Result<ApiKey, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE api_keys
            SET name = $2, value = $3, usage = $4, limit_count = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(api_key.id())
        .bind(api_key.name())
        .bind(api_key.value())
        .bind(api_key.usage())
        .bind(api_key.limit_count())
        .bind(api_key.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                DomainError::conflict(format!(
                    "API key value '{}' already exists",
                    api_key.value()
                ))
            } else {
                DomainError::storage(format!("Failed to update API key: {e}"))
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "API key '{}' not found",
                api_key.id()
            )));
        }

        Ok(api_key.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM api_keys WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete API key: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, owner: Option<Uuid>) -> Result<Vec<ApiKey>, DomainError> {
        let rows = match owner {
            Some(user_id) => {
                sqlx::query(&format!(
                    "SELECT {COLUMNS} FROM api_keys WHERE user_id = $1 ORDER BY created_at DESC"
                ))
                .bind(user_id)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {COLUMNS} FROM api_keys ORDER BY created_at DESC"
                ))
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| DomainError::storage(format!("Failed to list API keys: {e}")))?;

        rows.iter().map(row_to_api_key).collect()
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM api_keys")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count API keys: {e}")))?;

        let count: i64 = row.get("count");
        Ok(count as usize)
    }
}

fn row_to_api_key(row: &sqlx::postgres::PgRow) -> Result<ApiKey, DomainError> {
    let id: Uuid = row.get("id");
    let user_id: Option<Uuid> = row.get("user_id");
    let name: String = row.get("name");
    let value: String = row.get("value");
    let usage: i64 = row.get("usage");
    let limit_count: i64 = row.get("limit_count");
    let created_at: DateTime<Utc> = row.get("created_at");
    let updated_at: DateTime<Utc> = row.get("updated_at");

    Ok(ApiKey::from_parts(
        id, user_id, name, value, usage, limit_count, created_at, updated_at,
    ))
}
