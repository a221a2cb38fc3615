//! Validation outcome types for the key-consumption contract

use serde::Serialize;
use uuid::Uuid;

use super::entity::ApiKey;

/// Resolved key metadata carried by successful validations.
///
/// `usage` reflects the counter at the time the outcome was produced; after
/// `validate_and_consume` it already includes the current request.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct KeyUsage {
    pub id: Uuid,
    pub name: String,
    pub usage: i64,
    pub limit: i64,
}

impl From<&ApiKey> for KeyUsage {
    fn from(key: &ApiKey) -> Self {
        Self {
            id: key.id(),
            name: key.name().to_string(),
            usage: key.usage(),
            limit: key.limit_count(),
        }
    }
}

/// Outcome of validating a presented credential.
///
/// Storage failures are not part of this enum; they surface as
/// `DomainError::Storage` so a broken store is never mistaken for a bad key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyValidation {
    /// Credential matched and the key has budget left
    Valid(KeyUsage),
    /// No credential was presented at all
    Missing,
    /// Credential matched no stored record
    Invalid,
    /// Credential matched but the usage ceiling is reached
    LimitExceeded(KeyUsage),
}

impl KeyValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

/// Outcome of a single usage increment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncrementOutcome {
    /// Counter advanced by one; carries the post-increment metadata
    Updated(KeyUsage),
    /// Ceiling already reached at read time; no write performed
    LimitExceeded(KeyUsage),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_usage_from_entity() {
        let key = ApiKey::new("Test Key", "dandi-abc0123456", None, Some(100));
        let usage = KeyUsage::from(&key);

        assert_eq!(usage.id, key.id());
        assert_eq!(usage.name, "Test Key");
        assert_eq!(usage.usage, 0);
        assert_eq!(usage.limit, 100);
    }

    #[test]
    fn test_is_valid() {
        let key = ApiKey::new("Test Key", "dandi-abc0123456", None, None);
        let usage = KeyUsage::from(&key);

        assert!(KeyValidation::Valid(usage.clone()).is_valid());
        assert!(!KeyValidation::Missing.is_valid());
        assert!(!KeyValidation::Invalid.is_valid());
        assert!(!KeyValidation::LimitExceeded(usage).is_valid());
    }
}
