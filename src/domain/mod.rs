//! Domain layer - Core business logic and entities

pub mod api_key;
pub mod error;
pub mod github;
pub mod summary;
pub mod user;

pub use api_key::{
    ApiKey, ApiKeyRepository, IncrementOutcome, KeyUsage, KeyValidation, DEFAULT_USAGE_LIMIT,
};
pub use error::DomainError;
pub use github::{RepoFetcher, RepoMetadata, RepoRef};
pub use summary::{ReadmeSummarizer, RepoSummary};
pub use user::{User, UserRepository};
