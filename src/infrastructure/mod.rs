pub mod api_key;
pub mod auth;
pub mod db;
pub mod github;
pub mod logging;
pub mod summarizer;
pub mod user;
