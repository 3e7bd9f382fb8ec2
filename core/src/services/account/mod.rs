//! Account management service
//!
//! Registration, lookup, paginated listing, modification, deletion, and
//! the account-recovery helpers (duplicate-phone probe, find-email,
//! reset-password).

mod service;

#[cfg(test)]
mod tests;

pub use service::{AccountChanges, AccountService, NewAccount, RESET_PASSWORD};
