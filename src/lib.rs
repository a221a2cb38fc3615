//! Dandi Gateway
//!
//! API key management and GitHub repository summarization service:
//! - Owner-scoped API key CRUD with generated credential values
//! - Key validation and usage-limited consumption
//! - README summarization via the OpenAI chat completions API

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::info;

use api::middleware::CredentialSources;
use api::state::AppState;
use infrastructure::api_key::{ApiKeyService, KeyValueGenerator, PostgresApiKeyRepository};
use infrastructure::auth::{JwtConfig, JwtService};
use infrastructure::github::GitHubClient;
use infrastructure::summarizer::{OpenAiConfig, OpenAiSummarizer};
use infrastructure::db;
use infrastructure::user::{PostgresUserRepository, UserService};

/// Create the application state from configuration
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    info!("Connecting to PostgreSQL...");
    let pool = db::connect(&config.database).await?;
    db::run_migrations(&pool).await?;
    info!("PostgreSQL connection established");

    let api_key_service: Arc<dyn api::state::ApiKeyServiceTrait> = Arc::new(
        ApiKeyService::new(Arc::new(PostgresApiKeyRepository::new(pool.clone())))
            .with_generator(KeyValueGenerator::new(&config.api_keys.value_prefix))
            .with_default_limit(config.api_keys.default_limit),
    );

    let user_service: Arc<dyn api::state::UserServiceTrait> = Arc::new(UserService::new(
        Arc::new(PostgresUserRepository::new(pool)),
    ));

    let jwt_verifier = Arc::new(JwtService::new(JwtConfig::new(
        config.auth.jwt_secret.clone(),
        config.auth.jwt_expiration_hours,
    )));

    let repo_fetcher = Arc::new(GitHubClient::new(
        config.github.base_url.clone(),
        config.github.user_agent.clone(),
        config.github.timeout_secs,
    )?);

    let summarizer = Arc::new(OpenAiSummarizer::new(OpenAiConfig {
        base_url: config.summarizer.base_url.clone(),
        api_key: config.summarizer.api_key.clone(),
        model: config.summarizer.model.clone(),
        temperature: config.summarizer.temperature,
        timeout_secs: config.summarizer.timeout_secs,
    })?);

    let credential_sources = CredentialSources {
        header_name: config.credentials.header_name.clone(),
        query_param: config.credentials.query_param.clone(),
        body_field: config.credentials.body_field.clone(),
    };

    Ok(AppState::new(
        api_key_service,
        user_service,
        jwt_verifier,
        repo_fetcher,
        summarizer,
        credential_sources,
    ))
}
