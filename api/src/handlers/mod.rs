//! Error translation between the domain layer and HTTP responses

pub mod error_handler;
