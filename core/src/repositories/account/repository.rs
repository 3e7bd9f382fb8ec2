//! Account repository trait defining the interface for account persistence.
//!
//! The trait is async-first and uses Result types for proper error handling.
//! Implementations handle the actual database operations while maintaining
//! the abstraction boundary between domain and infrastructure layers.

use async_trait::async_trait;

use crate::domain::entities::account::Account;
use crate::errors::DomainError;
use cm_shared::types::Pagination;

/// Optional filters for paginated account listings
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    /// Match accounts whose email contains this fragment
    pub email: Option<String>,

    /// Match accounts whose username contains this fragment
    pub username: Option<String>,

    /// Match accounts by activation state
    pub activated: Option<bool>,
}

/// Repository trait for Account entity persistence operations
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find an account by its email address
    ///
    /// # Returns
    /// * `Ok(Some(Account))` - Account found, roles populated
    /// * `Ok(None)` - No account with the given email
    /// * `Err(DomainError)` - Database or other error occurred
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError>;

    /// Find an account by its unique identifier
    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, DomainError>;

    /// Find an account by username and phone number (account recovery)
    async fn find_by_username_and_phone(
        &self,
        username: &str,
        phone: &str,
    ) -> Result<Option<Account>, DomainError>;

    /// Check if an account exists with the given email
    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError>;

    /// Check if an account exists with the given phone number
    async fn exists_by_phone(&self, phone: &str) -> Result<bool, DomainError>;

    /// Create a new account
    ///
    /// # Returns
    /// * `Ok(Account)` - The created account with its database-assigned id
    /// * `Err(DomainError)` - Creation failed (e.g. duplicate email)
    async fn create(&self, account: Account) -> Result<Account, DomainError>;

    /// Update an existing account (username, phone, activation, roles)
    async fn update(&self, account: Account) -> Result<Account, DomainError>;

    /// Replace the stored password hash for an account
    async fn update_password(&self, id: i64, password_hash: &str) -> Result<(), DomainError>;

    /// Delete an account
    ///
    /// # Returns
    /// * `Ok(true)` - Account was deleted
    /// * `Ok(false)` - Account not found
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;

    /// Fetch one page of accounts matching the filter, newest first
    ///
    /// # Returns
    /// The page of accounts plus the total number of matching rows.
    async fn find_page(
        &self,
        filter: &AccountFilter,
        pagination: &Pagination,
    ) -> Result<(Vec<Account>, u64), DomainError>;
}
