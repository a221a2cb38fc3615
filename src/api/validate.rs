//! API key validation endpoint

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::Serialize;
use tracing::debug;

use crate::api::middleware::{extract_credential, require_valid, validation_failure};
use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::api_key::KeyUsage;

/// Successful validation response
#[derive(Debug, Clone, Serialize)]
pub struct ValidateResponse {
    pub success: bool,
    pub message: String,
    pub data: KeyUsage,
}

/// POST /api/validate
///
/// Read-only check: reports whether the presented key is valid and has
/// budget left, without consuming any usage.
pub async fn validate_api_key(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Option<Json<serde_json::Value>>,
) -> Result<Json<ValidateResponse>, ApiError> {
    let body = body.map(|Json(v)| v);

    let candidate = extract_credential(
        &state.credential_sources,
        &headers,
        &query,
        body.as_ref(),
    )
    .unwrap_or_default();

    debug!("Validating presented API key");

    let validation = state
        .api_key_service
        .validate(&candidate)
        .await
        .map_err(validation_failure)?;

    let usage = require_valid(validation)?;

    Ok(Json(ValidateResponse {
        success: true,
        message: "API key is valid".to_string(),
        data: usage,
    }))
}
