pub mod app_config;

pub use app_config::{
    ApiKeysConfig, AppConfig, AuthConfig, CredentialsConfig, DatabaseConfig, GitHubConfig,
    LogFormat, LoggingConfig, ServerConfig, SummarizerConfig,
};
