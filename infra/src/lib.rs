//! # Commerce Infrastructure
//!
//! Infrastructure layer providing concrete implementations of the core
//! repository interfaces: MySQL persistence via SQLx.

pub mod database;

use thiserror::Error;

/// Infrastructure-level errors
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub use database::connection::DatabasePool;
pub use database::mysql::MySqlAccountRepository;
