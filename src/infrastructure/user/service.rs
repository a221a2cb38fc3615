//! User service

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::user::{User, UserRepository};
use crate::domain::DomainError;

/// User service
#[derive(Debug)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    /// Create a new user service
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Get a user by ID
    pub async fn get(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        self.repository.get(id).await
    }

    /// Get a user by email
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.repository.get_by_email(email).await
    }

    /// Look up a user by email, creating the record on first sight.
    /// Sign-in flows call this so a verified identity always has a row.
    pub async fn ensure(&self, email: &str, name: Option<String>) -> Result<User, DomainError> {
        let email = email.trim().to_lowercase();

        if email.is_empty() {
            return Err(DomainError::validation("Email is required"));
        }

        if let Some(existing) = self.repository.get_by_email(&email).await? {
            return Ok(existing);
        }

        info!(email = %email, "Registering new user");

        self.repository.create(User::new(&email, name)).await
    }
}
