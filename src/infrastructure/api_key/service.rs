//! API Key service
//!
//! Owner-scoped key management plus the validation/consumption contract:
//! `validate` (read-only), `increment_usage` (guarded read-then-write) and
//! `validate_and_consume` composing the two.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::api_key::{
    ApiKey, ApiKeyRepository, IncrementOutcome, KeyUsage, KeyValidation, DEFAULT_USAGE_LIMIT,
};
use crate::domain::DomainError;

use super::generator::KeyValueGenerator;

/// Fields accepted when creating a key
#[derive(Debug, Clone, Default)]
pub struct CreateKeyParams {
    pub name: String,
    pub value: Option<String>,
    pub limit: Option<i64>,
    pub user_id: Option<Uuid>,
}

/// Fields accepted when editing a key
#[derive(Debug, Clone, Default)]
pub struct UpdateKeyParams {
    pub name: String,
    pub value: Option<String>,
    pub limit: Option<i64>,
}

/// API Key service
#[derive(Debug)]
pub struct ApiKeyService<R>
where
    R: ApiKeyRepository,
{
    repository: Arc<R>,
    generator: KeyValueGenerator,
    default_limit: i64,
}

impl<R: ApiKeyRepository> ApiKeyService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            generator: KeyValueGenerator::default(),
            default_limit: DEFAULT_USAGE_LIMIT,
        }
    }

    pub fn with_generator(mut self, generator: KeyValueGenerator) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_default_limit(mut self, limit: i64) -> Self {
        self.default_limit = limit;
        self
    }

    /// Create a new API key, generating a credential value when the caller
    /// omits one. `limit` falls back to the default ceiling.
    pub async fn create(&self, params: CreateKeyParams) -> Result<ApiKey, DomainError> {
        if params.name.trim().is_empty() {
            return Err(DomainError::validation("Name is required"));
        }

        if let Some(limit) = params.limit {
            if limit <= 0 {
                return Err(DomainError::validation("Limit must be a positive integer"));
            }
        }

        let value = params
            .value
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| self.generator.generate());

        let api_key = ApiKey::new(
            params.name.trim(),
            value.trim(),
            params.user_id,
            params.limit.or(Some(self.default_limit)),
        );

        info!(id = %api_key.id(), name = %api_key.name(), "Creating API key");

        self.repository.create(api_key).await
    }

    /// List keys, newest first, optionally scoped to one owner
    pub async fn list(&self, owner: Option<Uuid>) -> Result<Vec<ApiKey>, DomainError> {
        self.repository.list(owner).await
    }

    /// Get a key by ID
    pub async fn get(&self, id: Uuid) -> Result<Option<ApiKey>, DomainError> {
        self.repository.get(id).await
    }

    /// Count stored keys
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }

    /// Update an owner's key. A key that does not exist or belongs to someone
    /// else yields the same not-found outcome so ownership is never leaked.
    pub async fn update(
        &self,
        id: Uuid,
        owner: Uuid,
        params: UpdateKeyParams,
    ) -> Result<ApiKey, DomainError> {
        if params.name.trim().is_empty() {
            return Err(DomainError::validation("Name is required"));
        }

        if let Some(limit) = params.limit {
            if limit <= 0 {
                return Err(DomainError::validation("Limit must be a positive integer"));
            }
        }

        let mut key = self.get_owned(id, owner).await?;

        key.set_name(params.name.trim());
        if let Some(value) = params.value {
            key.set_value(value.trim());
        }
        if let Some(limit) = params.limit {
            key.set_limit_count(limit);
        }

        info!(id = %id, "Updating API key");

        self.repository.update(&key).await
    }

    /// Delete an owner's key, with the same ownership semantics as `update`
    pub async fn delete(&self, id: Uuid, owner: Uuid) -> Result<(), DomainError> {
        let key = self.get_owned(id, owner).await?;

        info!(id = %id, "Deleting API key");

        self.repository.delete(key.id()).await?;
        Ok(())
    }

    async fn get_owned(&self, id: Uuid, owner: Uuid) -> Result<ApiKey, DomainError> {
        self.repository
            .get(id)
            .await?
            .filter(|k| k.is_owned_by(owner))
            .ok_or_else(|| DomainError::not_found("API key not found or access denied"))
    }

    /// Validate a presented credential without consuming usage.
    ///
    /// An empty candidate returns `Missing` before any storage call. A
    /// missing row is the `Invalid` outcome; only genuine store failures
    /// become `Err`.
    pub async fn validate(&self, candidate: &str) -> Result<KeyValidation, DomainError> {
        let candidate = candidate.trim();

        if candidate.is_empty() {
            return Ok(KeyValidation::Missing);
        }

        debug!("Validating API key");

        let key = match self.repository.get_by_value(candidate).await? {
            Some(key) => key,
            None => return Ok(KeyValidation::Invalid),
        };

        if !key.has_budget() {
            return Ok(KeyValidation::LimitExceeded(KeyUsage::from(&key)));
        }

        Ok(KeyValidation::Valid(KeyUsage::from(&key)))
    }

    /// Advance the usage counter by one, guarded by the ceiling.
    ///
    /// This is a plain read-then-write, not a compare-and-swap: two racing
    /// consumers of a key one unit under its ceiling can both pass the guard
    /// and overshoot by one. The soft cap is the documented behavior.
    pub async fn increment_usage(&self, id: Uuid) -> Result<IncrementOutcome, DomainError> {
        let mut key = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("API key '{id}' not found")))?;

        if !key.has_budget() {
            return Ok(IncrementOutcome::LimitExceeded(KeyUsage::from(&key)));
        }

        key.record_consumption();
        let updated = self.repository.update(&key).await?;

        Ok(IncrementOutcome::Updated(KeyUsage::from(&updated)))
    }

    /// Validate a credential and consume one usage unit.
    ///
    /// Non-`Valid` validation outcomes are returned verbatim and nothing is
    /// written. Increment failures — including a ceiling hit inside the
    /// window between the validator's check and the write — surface as a
    /// generic internal failure; the true cause is logged.
    pub async fn validate_and_consume(
        &self,
        candidate: &str,
    ) -> Result<KeyValidation, DomainError> {
        let validation = self.validate(candidate).await?;

        let KeyValidation::Valid(usage) = validation else {
            return Ok(validation);
        };

        match self.increment_usage(usage.id).await {
            Ok(IncrementOutcome::Updated(updated)) => Ok(KeyValidation::Valid(updated)),
            Ok(IncrementOutcome::LimitExceeded(_)) => {
                warn!(id = %usage.id, "Usage ceiling hit between validation and increment");
                Err(DomainError::internal("API key usage limit exceeded"))
            }
            Err(e) => {
                warn!(id = %usage.id, error = %e, "Failed to increment API key usage");
                Err(DomainError::internal(e.to_string()))
            }
        }
    }
}
