//! Token service module for JWT management
//!
//! This module handles all token-related operations:
//! - Access and refresh token issuance (HS512, shared base64 secret)
//! - Token validation with typed failure kinds
//! - Authentication: resolving a token back to an account principal

mod config;
mod service;


pub use config::TokenConfig;
pub use service::TokenService;
