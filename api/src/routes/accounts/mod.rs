//! Account route handlers
//!
//! Registration, profile lookup, paginated listing, modification,
//! deletion, and the recovery helpers (phone duplicate probe, find-email,
//! reset-password).

pub mod check_phone;
pub mod create;
pub mod delete;
pub mod find_email;
pub mod get;
pub mod list;
pub mod me;
pub mod modify;
pub mod reset_password;
