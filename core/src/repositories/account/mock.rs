//! In-memory implementation of AccountRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::account::Account;
use crate::errors::DomainError;
use cm_shared::types::Pagination;

use super::repository::{AccountFilter, AccountRepository};

/// Mock account repository backed by a HashMap
pub struct MockAccountRepository {
    accounts: Arc<RwLock<HashMap<i64, Account>>>,
    next_id: AtomicI64,
}

impl MockAccountRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(RwLock::new(HashMap::new())),
            next_id: AtomicI64::new(1),
        }
    }

    fn matches(filter: &AccountFilter, account: &Account) -> bool {
        if let Some(ref email) = filter.email {
            if !account.email.contains(email.as_str()) {
                return false;
            }
        }
        if let Some(ref username) = filter.username {
            if !account.username.contains(username.as_str()) {
                return false;
            }
        }
        if let Some(activated) = filter.activated {
            if account.activated != activated {
                return false;
            }
        }
        true
    }
}

impl Default for MockAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountRepository for MockAccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| a.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(&id).cloned())
    }

    async fn find_by_username_and_phone(
        &self,
        username: &str,
        phone: &str,
    ) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|a| a.username == username && a.phone == phone)
            .cloned())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().any(|a| a.email == email))
    }

    async fn exists_by_phone(&self, phone: &str) -> Result<bool, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().any(|a| a.phone == phone))
    }

    async fn create(&self, mut account: Account) -> Result<Account, DomainError> {
        let mut accounts = self.accounts.write().await;

        if accounts.values().any(|a| a.email == account.email) {
            return Err(DomainError::Validation {
                message: "Email already registered".to_string(),
            });
        }

        account.id = self.next_id.fetch_add(1, Ordering::SeqCst);
        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn update(&self, account: Account) -> Result<Account, DomainError> {
        let mut accounts = self.accounts.write().await;

        if !accounts.contains_key(&account.id) {
            return Err(DomainError::NotFound {
                resource: "Account".to_string(),
            });
        }

        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> Result<(), DomainError> {
        let mut accounts = self.accounts.write().await;

        match accounts.get_mut(&id) {
            Some(account) => {
                account.password = password_hash.to_string();
                Ok(())
            }
            None => Err(DomainError::NotFound {
                resource: "Account".to_string(),
            }),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut accounts = self.accounts.write().await;
        Ok(accounts.remove(&id).is_some())
    }

    async fn find_page(
        &self,
        filter: &AccountFilter,
        pagination: &Pagination,
    ) -> Result<(Vec<Account>, u64), DomainError> {
        let accounts = self.accounts.read().await;

        let mut matching: Vec<Account> = accounts
            .values()
            .filter(|a| Self::matches(filter, a))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.id.cmp(&a.id));

        let total = matching.len() as u64;
        let page: Vec<Account> = matching
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.limit() as usize)
            .collect();

        Ok((page, total))
    }
}
