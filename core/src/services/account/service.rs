//! Account service implementation

use std::sync::Arc;

use crate::domain::entities::account::Account;
use crate::errors::{AuthError, DomainError};
use crate::repositories::{AccountFilter, AccountRepository};
use cm_shared::types::{PaginatedResponse, Pagination};

/// Fixed recovery password applied by `reset_password`
pub const RESET_PASSWORD: &str = "1111";

/// Registration data for a new account; `password` is the raw secret
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone: String,
}

/// Partial update applied by `modify_account`; `None` leaves a field as-is
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub username: Option<String>,
    pub phone: Option<String>,
    pub activated: Option<bool>,
}

/// Service for account CRUD and recovery operations
pub struct AccountService<A: AccountRepository> {
    accounts: Arc<A>,
}

impl<A: AccountRepository> AccountService<A> {
    /// Creates a new account service
    pub fn new(accounts: Arc<A>) -> Self {
        Self { accounts }
    }

    /// Registers a new account with a bcrypt-hashed password and the
    /// default role grant
    ///
    /// # Errors
    ///
    /// * `AuthError::EmailAlreadyRegistered` - email is taken
    pub async fn create_account(&self, new_account: NewAccount) -> Result<Account, DomainError> {
        if self.accounts.exists_by_email(&new_account.email).await? {
            return Err(DomainError::Auth(AuthError::EmailAlreadyRegistered));
        }

        let password_hash = hash_password(&new_account.password)?;
        let account = Account::new(
            new_account.username,
            new_account.email,
            password_hash,
            new_account.phone,
        );

        let created = self.accounts.create(account).await?;
        tracing::info!(account_id = created.id, "account created");
        Ok(created)
    }

    /// Fetches a single account by id
    pub async fn get_account(&self, id: i64) -> Result<Account, DomainError> {
        self.accounts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound {
                resource: "Account".to_string(),
            })
    }

    /// Fetches one page of accounts matching the filter
    pub async fn list_accounts(
        &self,
        filter: AccountFilter,
        pagination: Pagination,
    ) -> Result<PaginatedResponse<Account>, DomainError> {
        let pagination = pagination.validate();
        let (accounts, total) = self.accounts.find_page(&filter, &pagination).await?;
        Ok(PaginatedResponse::new(accounts, pagination, total))
    }

    /// Applies a partial update to an account
    pub async fn modify_account(
        &self,
        id: i64,
        changes: AccountChanges,
    ) -> Result<Account, DomainError> {
        let mut account = self.get_account(id).await?;

        if let Some(username) = changes.username {
            account.username = username;
        }
        if let Some(phone) = changes.phone {
            account.phone = phone;
        }
        if let Some(activated) = changes.activated {
            if activated {
                account.activate();
            } else {
                account.deactivate();
            }
        }
        account.updated_at = chrono::Utc::now();

        self.accounts.update(account).await
    }

    /// Deletes an account
    pub async fn delete_account(&self, id: i64) -> Result<(), DomainError> {
        if !self.accounts.delete(id).await? {
            return Err(DomainError::NotFound {
                resource: "Account".to_string(),
            });
        }
        tracing::info!(account_id = id, "account deleted");
        Ok(())
    }

    /// Checks whether a phone number is already registered
    pub async fn check_phone_duplicate(&self, phone: &str) -> Result<bool, DomainError> {
        self.accounts.exists_by_phone(phone).await
    }

    /// Resolves an email address from username + phone (account recovery)
    pub async fn find_email(&self, username: &str, phone: &str) -> Result<String, DomainError> {
        self.accounts
            .find_by_username_and_phone(username, phone)
            .await?
            .map(|account| account.email)
            .ok_or(DomainError::Auth(AuthError::AccountNotFound))
    }

    /// Resets the password of the account matching email + phone to the
    /// fixed recovery password
    ///
    /// # Returns
    ///
    /// The id of the account whose password was reset.
    pub async fn reset_password(&self, email: &str, phone: &str) -> Result<i64, DomainError> {
        let account = self
            .accounts
            .find_by_email(email)
            .await?
            .filter(|account| account.phone == phone)
            .ok_or(DomainError::Auth(AuthError::AccountNotFound))?;

        let password_hash = hash_password(RESET_PASSWORD)?;
        self.accounts
            .update_password(account.id, &password_hash)
            .await?;

        tracing::info!(account_id = account.id, "password reset");
        Ok(account.id)
    }
}

/// Hashes a raw password with bcrypt
pub(crate) fn hash_password(password: &str) -> Result<String, DomainError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|_| DomainError::Internal {
        message: "Password hashing failed".to_string(),
    })
}
