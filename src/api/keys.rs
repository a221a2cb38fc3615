//! API key management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::api_key::ApiKey;
use crate::infrastructure::api_key::{CreateKeyParams, UpdateKeyParams};

/// Request to create a new API key
#[derive(Debug, Clone, Deserialize)]
pub struct CreateApiKeyRequest {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Request to update an API key
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateApiKeyRequest {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// API key in responses
#[derive(Debug, Clone, Serialize)]
pub struct ApiKeyResponse {
    pub id: Uuid,
    pub name: String,
    pub value: String,
    pub usage: i64,
    pub limit: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&ApiKey> for ApiKeyResponse {
    fn from(key: &ApiKey) -> Self {
        Self {
            id: key.id(),
            name: key.name().to_string(),
            value: key.value().to_string(),
            usage: key.usage(),
            limit: key.limit_count(),
            created_at: key.created_at().to_rfc3339(),
            updated_at: key.updated_at().to_rfc3339(),
        }
    }
}

/// List API keys response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListApiKeysResponse {
    pub api_keys: Vec<ApiKeyResponse>,
}

/// Single API key response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyEnvelope {
    pub api_key: ApiKeyResponse,
}

/// GET /api/keys
pub async fn list_api_keys(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<ListApiKeysResponse>, ApiError> {
    debug!(user = %user.id(), "Listing API keys");

    let keys = state.api_key_service.list(Some(user.id())).await?;

    Ok(Json(ListApiKeysResponse {
        api_keys: keys.iter().map(ApiKeyResponse::from).collect(),
    }))
}

/// POST /api/keys
pub async fn create_api_key(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(request): Json<CreateApiKeyRequest>,
) -> Result<(StatusCode, Json<ApiKeyEnvelope>), ApiError> {
    debug!(user = %user.id(), name = %request.name, "Creating API key");

    let key = state
        .api_key_service
        .create(CreateKeyParams {
            name: request.name,
            value: request.value,
            limit: request.limit,
            user_id: Some(user.id()),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiKeyEnvelope {
            api_key: ApiKeyResponse::from(&key),
        }),
    ))
}

/// PUT /api/keys/{id}
pub async fn update_api_key(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateApiKeyRequest>,
) -> Result<Json<ApiKeyEnvelope>, ApiError> {
    debug!(user = %user.id(), id = %id, "Updating API key");

    let key = state
        .api_key_service
        .update(
            id,
            user.id(),
            UpdateKeyParams {
                name: request.name,
                value: request.value,
                limit: request.limit,
            },
        )
        .await?;

    Ok(Json(ApiKeyEnvelope {
        api_key: ApiKeyResponse::from(&key),
    }))
}

/// DELETE /api/keys/{id}
pub async fn delete_api_key(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    debug!(user = %user.id(), id = %id, "Deleting API key");

    state.api_key_service.delete(id, user.id()).await?;

    Ok(Json(serde_json::json!({
        "message": "API key deleted successfully"
    })))
}
