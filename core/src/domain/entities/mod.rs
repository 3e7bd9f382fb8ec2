//! Domain entities representing core business objects.

pub mod account;
pub mod token;

// Re-export commonly used types
pub use account::{Account, AccountPrincipal, DEFAULT_ROLE};
pub use token::{Claims, IssuedToken, BEARER_TYPE};
