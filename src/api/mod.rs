//! API layer - HTTP endpoints and middleware

pub mod health;
pub mod keys;
pub mod middleware;
pub mod router;
pub mod state;
pub mod summarize;
pub mod types;
pub mod validate;

pub use middleware::RequireUser;
pub use router::create_router;
pub use state::AppState;
