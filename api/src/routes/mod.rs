//! Route handlers grouped by resource

pub mod accounts;
pub mod auth;

use std::sync::Arc;

use cm_core::repositories::AccountRepository;
use cm_core::services::{AccountService, AuthService};

/// Application state that holds shared services
pub struct AppState<A: AccountRepository> {
    pub accounts: Arc<AccountService<A>>,
    pub auth: Arc<AuthService<A>>,
}
