pub mod api_key;
pub mod user_auth;

pub use api_key::{extract_credential, require_valid, validation_failure, CredentialSources};
pub use user_auth::RequireUser;
