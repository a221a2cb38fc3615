//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::user::{User, UserRepository};
use crate::domain::DomainError;

/// In-memory implementation of UserRepository
#[derive(Debug)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    /// Index for email -> user ID lookup
    email_index: Arc<RwLock<HashMap<String, Uuid>>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            email_index: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        // Release the index before locking the map; create takes the map
        // lock first, so overlapping the guards here would deadlock.
        let user_id = {
            let email_index = self.email_index.read().await;
            email_index.get(email).copied()
        };

        match user_id {
            Some(user_id) => {
                let users = self.users.read().await;
                Ok(users.get(&user_id).cloned())
            }
            None => Ok(None),
        }
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;
        let mut email_index = self.email_index.write().await;

        if email_index.contains_key(user.email()) {
            return Err(DomainError::conflict(format!(
                "User with email '{}' already exists",
                user.email()
            )));
        }

        email_index.insert(user.email().to_string(), user.id());
        users.insert(user.id(), user.clone());

        Ok(user)
    }
}
