//! API Key repository trait

use async_trait::async_trait;
use std::fmt::Debug;
use uuid::Uuid;

use super::entity::ApiKey;
use crate::domain::DomainError;

/// Repository trait for API key storage.
///
/// Every operation is a point query keyed by a unique field; no range scans
/// are needed for the consumption contract. "No row" is the `Ok(None)` /
/// `Ok(false)` outcome; `Err` is reserved for genuine storage failures.
#[async_trait]
pub trait ApiKeyRepository: Send + Sync + Debug {
    /// Get an API key by its ID
    async fn get(&self, id: Uuid) -> Result<Option<ApiKey>, DomainError>;

    /// Get an API key by its credential value (authentication lookup)
    async fn get_by_value(&self, value: &str) -> Result<Option<ApiKey>, DomainError>;

    /// Create a new API key
    async fn create(&self, api_key: ApiKey) -> Result<ApiKey, DomainError>;

    /// Update an existing API key
    async fn update(&self, api_key: &ApiKey) -> Result<ApiKey, DomainError>;

    /// Delete an API key; returns false when no such row existed
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;

    /// List keys, newest first, optionally scoped to one owner
    async fn list(&self, owner: Option<Uuid>) -> Result<Vec<ApiKey>, DomainError>;

    /// Count stored keys (readiness probes)
    async fn count(&self) -> Result<usize, DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// Mock API key repository whose operations can be flipped to fail,
    /// for exercising storage-failure paths.
    #[derive(Debug, Default)]
    pub struct MockApiKeyRepository {
        keys: Arc<RwLock<HashMap<Uuid, ApiKey>>>,
        should_fail: Arc<RwLock<bool>>,
    }

    impl MockApiKeyRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn set_should_fail(&self, fail: bool) {
            *self.should_fail.write().await = fail;
        }

        async fn check_should_fail(&self) -> Result<(), DomainError> {
            if *self.should_fail.read().await {
                return Err(DomainError::storage("Mock repository configured to fail"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ApiKeyRepository for MockApiKeyRepository {
        async fn get(&self, id: Uuid) -> Result<Option<ApiKey>, DomainError> {
            self.check_should_fail().await?;
            let keys = self.keys.read().await;
            Ok(keys.get(&id).cloned())
        }

        async fn get_by_value(&self, value: &str) -> Result<Option<ApiKey>, DomainError> {
            self.check_should_fail().await?;
            let keys = self.keys.read().await;
            Ok(keys.values().find(|k| k.value() == value).cloned())
        }

        async fn create(&self, api_key: ApiKey) -> Result<ApiKey, DomainError> {
            self.check_should_fail().await?;
            let mut keys = self.keys.write().await;

            if keys.values().any(|k| k.value() == api_key.value()) {
                return Err(DomainError::conflict(format!(
                    "API key value '{}' already exists",
                    api_key.value()
                )));
            }

            keys.insert(api_key.id(), api_key.clone());
            Ok(api_key)
        }

        async fn update(&self, api_key: &ApiKey) -> Result<ApiKey, DomainError> {
            self.check_should_fail().await?;
            let mut keys = self.keys.write().await;

            if !keys.contains_key(&api_key.id()) {
                return Err(DomainError::not_found(format!(
                    "API key '{}' not found",
                    api_key.id()
                )));
            }

            keys.insert(api_key.id(), api_key.clone());
            Ok(api_key.clone())
        }

        async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
            self.check_should_fail().await?;
            let mut keys = self.keys.write().await;
            Ok(keys.remove(&id).is_some())
        }

        async fn list(&self, owner: Option<Uuid>) -> Result<Vec<ApiKey>, DomainError> {
            self.check_should_fail().await?;
            let keys = self.keys.read().await;

            let mut result: Vec<ApiKey> = keys
                .values()
                .filter(|k| owner.is_none() || k.user_id() == owner)
                .cloned()
                .collect();
            result.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

            Ok(result)
        }

        async fn count(&self) -> Result<usize, DomainError> {
            self.check_should_fail().await?;
            let keys = self.keys.read().await;
            Ok(keys.len())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn create_test_key(name: &str, value: &str) -> ApiKey {
            ApiKey::new(name, value, None, None)
        }

        #[tokio::test]
        async fn test_create_and_get_by_value() {
            let repo = MockApiKeyRepository::new();
            let key = create_test_key("Key 1", "dandi-aaa1111111");

            repo.create(key.clone()).await.unwrap();

            let found = repo.get_by_value("dandi-aaa1111111").await.unwrap();
            assert_eq!(found.unwrap().id(), key.id());
        }

        #[tokio::test]
        async fn test_duplicate_value_conflicts() {
            let repo = MockApiKeyRepository::new();
            repo.create(create_test_key("Key 1", "dandi-aaa1111111"))
                .await
                .unwrap();

            let err = repo
                .create(create_test_key("Key 2", "dandi-aaa1111111"))
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::Conflict { .. }));
        }

        #[tokio::test]
        async fn test_should_fail_switch() {
            let repo = MockApiKeyRepository::new();
            repo.set_should_fail(true).await;

            let err = repo.get_by_value("dandi-aaa1111111").await.unwrap_err();
            assert!(matches!(err, DomainError::Storage { .. }));
        }
    }
}
