//! User entity
//!
//! Accounts exist only to scope key ownership; sign-in happens in an
//! external collaborator that hands us a signed token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Owning account for API keys
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    id: Uuid,
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    created_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: impl Into<String>, name: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            name,
            created_at: Utc::now(),
        }
    }

    pub fn from_parts(
        id: Uuid,
        email: String,
        name: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            name,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user() {
        let user = User::new("dev@example.com", Some("Dev".to_string()));

        assert_eq!(user.email(), "dev@example.com");
        assert_eq!(user.name(), Some("Dev"));
    }
}
