pub mod generator;
pub mod postgres_repository;
pub mod repository;
pub mod service;

pub use generator::KeyValueGenerator;
pub use postgres_repository::PostgresApiKeyRepository;
pub use repository::InMemoryApiKeyRepository;
pub use service::{ApiKeyService, CreateKeyParams, UpdateKeyParams};
