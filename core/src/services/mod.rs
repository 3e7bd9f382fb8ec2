//! Business services containing domain logic and use cases.

pub mod account;
pub mod auth;
pub mod token;

// Re-export commonly used types
pub use account::AccountService;
pub use auth::AuthService;
pub use token::{TokenConfig, TokenService};
