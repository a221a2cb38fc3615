//! API Key domain
//!
//! Domain types and traits for API keys: the entity, the repository contract
//! and the validation/consumption outcome types.

mod entity;
pub mod repository;
mod validation;

pub use entity::{ApiKey, DEFAULT_USAGE_LIMIT};
pub use repository::ApiKeyRepository;
pub use validation::{IncrementOutcome, KeyUsage, KeyValidation};
