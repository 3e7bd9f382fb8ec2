//! Shared utilities and common types for the commerce server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Error response structures
//! - Common type definitions (pagination, etc.)

pub mod config;
pub mod errors;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{AppConfig, DatabaseConfig, Environment, JwtConfig, ServerConfig};
pub use errors::{error_codes, ErrorResponse};
pub use types::{PaginatedResponse, Pagination};
