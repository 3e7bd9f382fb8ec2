//! Request and response data transfer objects

pub mod account_dto;
pub mod auth_dto;
