//! API key extraction and consumption middleware

use std::collections::HashMap;

use axum::http::HeaderMap;

use crate::api::types::ApiError;
use crate::domain::api_key::{KeyUsage, KeyValidation};
use crate::domain::DomainError;

/// Where a request may carry its API key credential.
///
/// Sources are tried in a fixed order: header, then query parameter,
/// then (for handlers that read one) a field in the JSON body.
#[derive(Debug, Clone)]
pub struct CredentialSources {
    pub header_name: String,
    pub query_param: String,
    pub body_field: String,
}

impl Default for CredentialSources {
    fn default() -> Self {
        Self {
            header_name: "x-api-key".to_string(),
            query_param: "apiKey".to_string(),
            body_field: "apiKey".to_string(),
        }
    }
}

/// Pull the credential out of a request, first match wins.
///
/// `body` is only provided by handlers that already parsed a JSON body;
/// the read-only extractors never touch it.
pub fn extract_credential(
    sources: &CredentialSources,
    headers: &HeaderMap,
    query: &HashMap<String, String>,
    body: Option<&serde_json::Value>,
) -> Option<String> {
    if let Some(value) = headers.get(sources.header_name.as_str()) {
        if let Ok(value) = value.to_str() {
            return Some(value.to_string());
        }
    }

    if let Some(value) = query.get(&sources.query_param) {
        return Some(value.clone());
    }

    if let Some(body) = body {
        if let Some(value) = body.get(&sources.body_field).and_then(|v| v.as_str()) {
            return Some(value.to_string());
        }
    }

    None
}

/// Map a validation outcome onto the wire contract
pub fn require_valid(validation: KeyValidation) -> Result<KeyUsage, ApiError> {
    match validation {
        KeyValidation::Valid(usage) => Ok(usage),
        KeyValidation::Missing => Err(ApiError::bad_request("API key is required")),
        KeyValidation::Invalid => Err(ApiError::unauthorized("Invalid API key")),
        KeyValidation::LimitExceeded(_) => {
            Err(ApiError::rate_limited("API key usage limit exceeded"))
        }
    }
}

/// Map validation-path failures onto the wire contract. Orchestrator
/// failures keep their message; anything else is reported generically
/// so storage details never leak.
pub fn validation_failure(err: DomainError) -> ApiError {
    match err {
        DomainError::Internal { message } => ApiError::internal(message),
        _ => ApiError::internal("Error validating API key"),
    }
}
