//! In-memory API key repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::api_key::{ApiKey, ApiKeyRepository};
use crate::domain::DomainError;

/// In-memory implementation of ApiKeyRepository.
///
/// Keeps a secondary index keyed by credential value so the authentication
/// lookup stays a point read, like the unique index in the real store.
#[derive(Debug, Default)]
pub struct InMemoryApiKeyRepository {
    keys: Arc<RwLock<HashMap<Uuid, ApiKey>>>,
    value_index: Arc<RwLock<HashMap<String, Uuid>>>,
}

impl InMemoryApiKeyRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApiKeyRepository for InMemoryApiKeyRepository {
    async fn get(&self, id: Uuid) -> Result<Option<ApiKey>, DomainError> {
        let keys = self.keys.read().await;
        Ok(keys.get(&id).cloned())
    }

    async fn get_by_value(&self, value: &str) -> Result<Option<ApiKey>, DomainError> {
        // Copy the id out and release the index before touching the map;
        // writers take the map lock first, so holding both here would invert
        // the lock order and deadlock against a concurrent create.
        let id = {
            let value_index = self.value_index.read().await;
            value_index.get(value).copied()
        };

        match id {
            Some(id) => {
                let keys = self.keys.read().await;
                Ok(keys.get(&id).cloned())
            }
            None => Ok(None),
        }
    }

    async fn create(&self, api_key: ApiKey) -> Result<ApiKey, DomainError> {
        let mut keys = self.keys.write().await;
        let mut value_index = self.value_index.write().await;

        if value_index.contains_key(api_key.value()) {
            return Err(DomainError::conflict(format!(
                "API key value '{}' already exists",
                api_key.value()
            )));
        }

        value_index.insert(api_key.value().to_string(), api_key.id());
        keys.insert(api_key.id(), api_key.clone());

        Ok(api_key)
    }

    async fn update(&self, api_key: &ApiKey) -> Result<ApiKey, DomainError> {
        let mut keys = self.keys.write().await;
        let mut value_index = self.value_index.write().await;

        let existing = keys.get(&api_key.id()).ok_or_else(|| {
            DomainError::not_found(format!("API key '{}' not found", api_key.id()))
        })?;

        // Re-key the value index when the credential changed
        if existing.value() != api_key.value() {
            if value_index.contains_key(api_key.value()) {
                return Err(DomainError::conflict(format!(
                    "API key value '{}' already exists",
                    api_key.value()
                )));
            }
            value_index.remove(existing.value());
            value_index.insert(api_key.value().to_string(), api_key.id());
        }

        keys.insert(api_key.id(), api_key.clone());
        Ok(api_key.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut keys = self.keys.write().await;
        let mut value_index = self.value_index.write().await;

        match keys.remove(&id) {
            Some(removed) => {
                value_index.remove(removed.value());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list(&self, owner: Option<Uuid>) -> Result<Vec<ApiKey>, DomainError> {
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
        let keys = self.keys.read().await;
        Ok(keys.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_key(name: &str, value: &str, owner: Option<Uuid>) -> ApiKey {
        ApiKey::new(name, value, owner, None)
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let repo = InMemoryApiKeyRepository::new();
        let key = create_test_key("Key 1", "dandi-aaa1111111", None);

        repo.create(key.clone()).await.unwrap();

        let by_id = repo.get(key.id()).await.unwrap();
        assert!(by_id.is_some());

        let by_value = repo.get_by_value("dandi-aaa1111111").await.unwrap();
        assert_eq!(by_value.unwrap().id(), key.id());
    }

    #[tokio::test]
    async fn test_unknown_value_is_none() {
        let repo = InMemoryApiKeyRepository::new();

        let found = repo.get_by_value("dandi-zzz0000000").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_value_rejected() {
        let repo = InMemoryApiKeyRepository::new();
        repo.create(create_test_key("Key 1", "dandi-aaa1111111", None))
            .await
            .unwrap();

        let err = repo
            .create(create_test_key("Key 2", "dandi-aaa1111111", None))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_update_rekeys_value_index() {
        let repo = InMemoryApiKeyRepository::new();
        let mut key = create_test_key("Key 1", "dandi-aaa1111111", None);
        repo.create(key.clone()).await.unwrap();

        key.set_value("dandi-bbb2222222");
        repo.update(&key).await.unwrap();

        assert!(repo.get_by_value("dandi-aaa1111111").await.unwrap().is_none());
        assert!(repo.get_by_value("dandi-bbb2222222").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_clears_value_index() {
        let repo = InMemoryApiKeyRepository::new();
        let key = create_test_key("Key 1", "dandi-aaa1111111", None);
        repo.create(key.clone()).await.unwrap();

        assert!(repo.delete(key.id()).await.unwrap());
        assert!(!repo.delete(key.id()).await.unwrap());
        assert!(repo.get_by_value("dandi-aaa1111111").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_lookups_and_writes_complete() {
        let repo = Arc::new(InMemoryApiKeyRepository::new());

        let writer = {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move {
                for i in 0..500 {
                    let key = create_test_key("Key", &format!("dandi-key{i:07}"), None);
                    repo.create(key).await.unwrap();
                }
            })
        };
        let reader = {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move {
                for i in 0..500 {
                    repo.get_by_value(&format!("dandi-key{i:07}")).await.unwrap();
                }
            })
        };

        tokio::time::timeout(std::time::Duration::from_secs(5), async {
            writer.await.unwrap();
            reader.await.unwrap();
        })
        .await
        .expect("concurrent create and get_by_value should not deadlock");
    }

    #[tokio::test]
    async fn test_list_scoped_to_owner() {
        let repo = InMemoryApiKeyRepository::new();
        let owner = Uuid::new_v4();

        repo.create(create_test_key("Mine", "dandi-aaa1111111", Some(owner)))
            .await
            .unwrap();
        repo.create(create_test_key("Theirs", "dandi-bbb2222222", Some(Uuid::new_v4())))
            .await
            .unwrap();
        repo.create(create_test_key("Anon", "dandi-ccc3333333", None))
            .await
            .unwrap();

        let mine = repo.list(Some(owner)).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].name(), "Mine");

        let all = repo.list(None).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(repo.count().await.unwrap(), 3);
    }
}
