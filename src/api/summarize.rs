//! GitHub repository summarization endpoint

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::api::middleware::{extract_credential, require_valid, validation_failure};
use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::api_key::KeyUsage;
use crate::domain::github::{RepoMetadata, RepoRef};
use crate::domain::summary::RepoSummary;

/// Summarization response. `summary` is present on full success and
/// `error` on partial success; the key's usage is charged either way.
#[derive(Debug, Clone, Serialize)]
pub struct SummarizeResponse {
    pub success: bool,
    pub message: String,
    pub data: KeyUsage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SummaryPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Summary content plus repository metadata
#[derive(Debug, Clone, Serialize)]
pub struct SummaryPayload {
    #[serde(flatten)]
    pub summary: RepoSummary,
    #[serde(flatten)]
    pub metadata: RepoMetadata,
}

/// POST /api/github-summarizer
///
/// Consumes one usage unit on every authorized attempt. Upstream
/// failures after the charge report partial success rather than an
/// error status, so the spent unit is visible to the caller.
pub async fn summarize_repository(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Option<Json<serde_json::Value>>,
) -> Result<Json<SummarizeResponse>, ApiError> {
    let body = body.map(|Json(v)| v);

    let candidate = extract_credential(
        &state.credential_sources,
        &headers,
        &query,
        body.as_ref(),
    )
    .unwrap_or_default();

    let validation = state
        .api_key_service
        .validate_and_consume(&candidate)
        .await
        .map_err(validation_failure)?;

    let usage = require_valid(validation)?;

    let github_url = body
        .as_ref()
        .and_then(|b| b.get("githubUrl"))
        .and_then(|v| v.as_str())
        .map(str::to_string);

    let Some(github_url) = github_url else {
        return Ok(Json(SummarizeResponse {
            success: true,
            message: "API key is valid".to_string(),
            data: usage,
            summary: None,
            error: None,
        }));
    };

    // The charge already happened; a bad URL reports partial success like
    // any other fetch failure instead of a hard error.
    let repo = match RepoRef::parse(&github_url) {
        Ok(repo) => repo,
        Err(e) => {
            warn!(url = %github_url, error = %e, "Rejected repository URL");
            return Ok(Json(partial_success(
                usage,
                "API key is valid but failed to fetch README content",
                e.to_string(),
            )));
        }
    };

    debug!(repo = %repo, "Summarizing repository");

    let readme = match state.repo_fetcher.fetch_readme(&repo).await {
        Ok(readme) => readme,
        Err(e) => {
            warn!(repo = %repo, error = %e, "Failed to fetch README");
            return Ok(Json(partial_success(
                usage,
                "API key is valid but failed to fetch README content",
                e.to_string(),
            )));
        }
    };

    let (summary, metadata) = tokio::join!(
        state.summarizer.summarize(&readme),
        state.repo_fetcher.fetch_metadata(&repo),
    );

    let summary = match summary {
        Ok(summary) => summary,
        Err(e) => {
            warn!(repo = %repo, error = %e, "Failed to summarize README");
            return Ok(Json(partial_success(
                usage,
                "API key is valid but failed to summarize repository",
                e.to_string(),
            )));
        }
    };

    // Metadata is decoration; a lookup failure does not spoil the summary
    let metadata = metadata.unwrap_or_default();

    Ok(Json(SummarizeResponse {
        success: true,
        message: "API key is valid and repository summarized".to_string(),
        data: usage,
        summary: Some(SummaryPayload { summary, metadata }),
        error: None,
    }))
}

fn partial_success(
    usage: KeyUsage,
    message: impl Into<String>,
    error: impl Into<String>,
) -> SummarizeResponse {
    SummarizeResponse {
        success: true,
        message: message.into(),
        data: usage,
        summary: None,
        error: Some(error.into()),
    }
}
