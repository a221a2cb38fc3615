//! API Key entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default usage ceiling applied when a key is created without one.
pub const DEFAULT_USAGE_LIMIT: i64 = 1000;

/// API Key entity
///
/// The credential `value` is the lookup key and is unique across records.
/// `usage` only ever grows; the ceiling is enforced at increment time by the
/// service layer, not by a storage constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKey {
    /// Unique identifier, immutable across edits
    id: Uuid,
    /// Owning account, absent for anonymous/test keys
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<Uuid>,
    /// Display name for the key
    name: String,
    /// The credential string presented by callers
    value: String,
    /// Count of successful consumptions
    usage: i64,
    /// Ceiling on `usage`
    limit_count: i64,
    /// Creation timestamp
    created_at: DateTime<Utc>,
    /// Last mutation timestamp
    updated_at: DateTime<Utc>,
}

impl ApiKey {
    /// Create a new API key with zero usage
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        user_id: Option<Uuid>,
        limit_count: Option<i64>,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            user_id,
            name: name.into(),
            value: value.into(),
            usage: 0,
            limit_count: limit_count.unwrap_or(DEFAULT_USAGE_LIMIT),
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild an entity from stored fields (repository use)
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: Uuid,
        user_id: Option<Uuid>,
        name: String,
        value: String,
        usage: i64,
        limit_count: i64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            name,
            value,
            usage,
            limit_count,
            created_at,
            updated_at,
        }
    }

    // Getters

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.user_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn usage(&self) -> i64 {
        self.usage
    }

    pub fn limit_count(&self) -> i64 {
        self.limit_count
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether the key still has budget for one more consumption
    pub fn has_budget(&self) -> bool {
        self.usage < self.limit_count
    }

    /// Whether the key belongs to the given account
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == Some(user_id)
    }

    // Mutators

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.touch();
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.touch();
    }

    pub fn set_limit_count(&mut self, limit_count: i64) {
        self.limit_count = limit_count;
        self.touch();
    }

    /// Record one consumption. Callers must check `has_budget` first; this
    /// method does not enforce the ceiling.
    pub fn record_consumption(&mut self) {
        self.usage += 1;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
