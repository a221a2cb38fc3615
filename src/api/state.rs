//! Application state for shared services

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::api_key::{ApiKey, ApiKeyRepository, IncrementOutcome, KeyValidation};
use crate::domain::github::RepoFetcher;
use crate::domain::summary::ReadmeSummarizer;
use crate::domain::user::{User, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::api_key::{ApiKeyService, CreateKeyParams, UpdateKeyParams};
use crate::infrastructure::auth::JwtVerifier;
use crate::infrastructure::user::UserService;

use super::middleware::CredentialSources;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub api_key_service: Arc<dyn ApiKeyServiceTrait>,
    pub user_service: Arc<dyn UserServiceTrait>,
    pub jwt_verifier: Arc<dyn JwtVerifier>,
    pub repo_fetcher: Arc<dyn RepoFetcher>,
    pub summarizer: Arc<dyn ReadmeSummarizer>,
    pub credential_sources: CredentialSources,
}

/// Trait for API key service operations
#[async_trait::async_trait]
pub trait ApiKeyServiceTrait: Send + Sync {
    async fn create(&self, params: CreateKeyParams) -> Result<ApiKey, DomainError>;
    async fn list(&self, owner: Option<Uuid>) -> Result<Vec<ApiKey>, DomainError>;
    async fn get(&self, id: Uuid) -> Result<Option<ApiKey>, DomainError>;
    async fn count(&self) -> Result<usize, DomainError>;
    async fn update(
        &self,
        id: Uuid,
        owner: Uuid,
        params: UpdateKeyParams,
    ) -> Result<ApiKey, DomainError>;
    async fn delete(&self, id: Uuid, owner: Uuid) -> Result<(), DomainError>;
    async fn validate(&self, candidate: &str) -> Result<KeyValidation, DomainError>;
    async fn increment_usage(&self, id: Uuid) -> Result<IncrementOutcome, DomainError>;
    async fn validate_and_consume(&self, candidate: &str) -> Result<KeyValidation, DomainError>;
}

/// Trait for user service operations
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<User>, DomainError>;
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
    async fn ensure(&self, email: &str, name: Option<String>) -> Result<User, DomainError>;
}

#[async_trait::async_trait]
impl<R: ApiKeyRepository + 'static> ApiKeyServiceTrait for ApiKeyService<R> {
    async fn create(&self, params: CreateKeyParams) -> Result<ApiKey, DomainError> {
        ApiKeyService::create(self, params).await
    }

    async fn list(&self, owner: Option<Uuid>) -> Result<Vec<ApiKey>, DomainError> {
        ApiKeyService::list(self, owner).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<ApiKey>, DomainError> {
        ApiKeyService::get(self, id).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        ApiKeyService::count(self).await
    }

    async fn update(
        &self,
        id: Uuid,
        owner: Uuid,
        params: UpdateKeyParams,
    ) -> Result<ApiKey, DomainError> {
        ApiKeyService::update(self, id, owner, params).await
    }

    async fn delete(&self, id: Uuid, owner: Uuid) -> Result<(), DomainError> {
        ApiKeyService::delete(self, id, owner).await
    }

    async fn validate(&self, candidate: &str) -> Result<KeyValidation, DomainError> {
        ApiKeyService::validate(self, candidate).await
    }

    async fn increment_usage(&self, id: Uuid) -> Result<IncrementOutcome, DomainError> {
        ApiKeyService::increment_usage(self, id).await
    }

    async fn validate_and_consume(&self, candidate: &str) -> Result<KeyValidation, DomainError> {
        ApiKeyService::validate_and_consume(self, candidate).await
    }
}

#[async_trait::async_trait]
impl<R: UserRepository + 'static> UserServiceTrait for UserService<R> {
    async fn get(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        UserService::get(self, id).await
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        UserService::get_by_email(self, email).await
    }

    async fn ensure(&self, email: &str, name: Option<String>) -> Result<User, DomainError> {
        UserService::ensure(self, email, name).await
    }
}

impl AppState {
    /// Create new application state with provided services
    pub fn new(
        api_key_service: Arc<dyn ApiKeyServiceTrait>,
        user_service: Arc<dyn UserServiceTrait>,
        jwt_verifier: Arc<dyn JwtVerifier>,
        repo_fetcher: Arc<dyn RepoFetcher>,
        summarizer: Arc<dyn ReadmeSummarizer>,
        credential_sources: CredentialSources,
    ) -> Self {
        Self {
            api_key_service,
            user_service,
            jwt_verifier,
            repo_fetcher,
            summarizer,
            credential_sources,
        }
    }
}
