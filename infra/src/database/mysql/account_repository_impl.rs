//! MySQL implementation of the AccountRepository trait.
//!
//! Accounts live in the `accounts` table; role grants are a join through
//! `account_roles` to `roles`. All reads return accounts with their role
//! set populated.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use std::collections::HashSet;

use cm_core::domain::entities::account::Account;
use cm_core::errors::DomainError;
use cm_core::repositories::{AccountFilter, AccountRepository};
use cm_shared::types::Pagination;

/// MySQL implementation of AccountRepository
pub struct MySqlAccountRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlAccountRepository {
    /// Create a new MySQL account repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn db_error(context: &str, e: sqlx::Error) -> DomainError {
        DomainError::Database {
            message: format!("{}: {}", context, e),
        }
    }

    /// Convert a database row to an Account entity (roles fetched separately)
    fn row_to_account(row: &sqlx::mysql::MySqlRow) -> Result<Account, DomainError> {
        Ok(Account {
            id: row
                .try_get("id")
                .map_err(|e| Self::db_error("Failed to get id", e))?,
            username: row
                .try_get("username")
                .map_err(|e| Self::db_error("Failed to get username", e))?,
            email: row
                .try_get("email")
                .map_err(|e| Self::db_error("Failed to get email", e))?,
            password: row
                .try_get("password")
                .map_err(|e| Self::db_error("Failed to get password", e))?,
            phone: row
                .try_get("phone")
                .map_err(|e| Self::db_error("Failed to get phone", e))?,
            activated: row
                .try_get("activated")
                .map_err(|e| Self::db_error("Failed to get activated", e))?,
            roles: HashSet::new(),
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| Self::db_error("Failed to get created_at", e))?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| Self::db_error("Failed to get updated_at", e))?,
        })
    }

    /// Fetch the role names granted to an account
    async fn fetch_roles(&self, account_id: i64) -> Result<HashSet<String>, DomainError> {
        let query = r#"
            SELECT r.role_name
            FROM roles r
            INNER JOIN account_roles ar ON ar.role_id = r.id
            WHERE ar.account_id = ?
        "#;

        let rows = sqlx::query(query)
            .bind(account_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Self::db_error("Role query failed", e))?;

        let mut roles = HashSet::new();
        for row in rows {
            let name: String = row
                .try_get("role_name")
                .map_err(|e| Self::db_error("Failed to get role_name", e))?;
            roles.insert(name);
        }
        Ok(roles)
    }

    async fn load_account(
        &self,
        row: Option<sqlx::mysql::MySqlRow>,
    ) -> Result<Option<Account>, DomainError> {
        match row {
            Some(row) => {
                let mut account = Self::row_to_account(&row)?;
                account.roles = self.fetch_roles(account.id).await?;
                Ok(Some(account))
            }
            None => Ok(None),
        }
    }

    /// Replace the role grants of an account inside a transaction
    async fn replace_roles(
        tx: &mut sqlx::Transaction<'_, sqlx::MySql>,
        account_id: i64,
        roles: &HashSet<String>,
    ) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM account_roles WHERE account_id = ?")
            .bind(account_id)
            .execute(&mut **tx)
            .await
            .map_err(|e| Self::db_error("Role cleanup failed", e))?;

        for role in roles {
            sqlx::query("INSERT IGNORE INTO roles (role_name) VALUES (?)")
                .bind(role)
                .execute(&mut **tx)
                .await
                .map_err(|e| Self::db_error("Role insert failed", e))?;

            sqlx::query(
                "INSERT INTO account_roles (account_id, role_id) \
                 SELECT ?, id FROM roles WHERE role_name = ?",
            )
            .bind(account_id)
            .bind(role)
            .execute(&mut **tx)
            .await
            .map_err(|e| Self::db_error("Role grant failed", e))?;
        }

        Ok(())
    }
}

#[async_trait]
impl AccountRepository for MySqlAccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        let query = r#"
            SELECT id, username, email, password, phone, activated,
                   created_at, updated_at
            FROM accounts
            WHERE email = ?
            LIMIT 1
        "#;

        let row = sqlx::query(query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Self::db_error("Database query failed", e))?;

        self.load_account(row).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, DomainError> {
        let query = r#"
            SELECT id, username, email, password, phone, activated,
                   created_at, updated_at
            FROM accounts
            WHERE id = ?
            LIMIT 1
        "#;

        let row = sqlx::query(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Self::db_error("Database query failed", e))?;

        self.load_account(row).await
    }

    async fn find_by_username_and_phone(
        &self,
        username: &str,
        phone: &str,
    ) -> Result<Option<Account>, DomainError> {
        let query = r#"
            SELECT id, username, email, password, phone, activated,
                   created_at, updated_at
            FROM accounts
            WHERE username = ? AND phone = ?
            LIMIT 1
        "#;

        let row = sqlx::query(query)
            .bind(username)
            .bind(phone)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Self::db_error("Database query failed", e))?;

        self.load_account(row).await
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) AS cnt FROM accounts WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Self::db_error("Database query failed", e))?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| Self::db_error("Failed to get count", e))?;
        Ok(count > 0)
    }

    async fn exists_by_phone(&self, phone: &str) -> Result<bool, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) AS cnt FROM accounts WHERE phone = ?")
            .bind(phone)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Self::db_error("Database query failed", e))?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| Self::db_error("Failed to get count", e))?;
        Ok(count > 0)
    }

    async fn create(&self, account: Account) -> Result<Account, DomainError> {
        if self.exists_by_email(&account.email).await? {
            return Err(DomainError::Validation {
                message: "Email already registered".to_string(),
            });
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Self::db_error("Transaction begin failed", e))?;

        let query = r#"
            INSERT INTO accounts (
                username, email, password, phone, activated,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
        "#;

        let result = sqlx::query(query)
            .bind(&account.username)
            .bind(&account.email)
            .bind(&account.password)
            .bind(&account.phone)
            .bind(account.activated)
            .bind(account.created_at)
            .bind(account.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| Self::db_error("Account insert failed", e))?;

        let id = result.last_insert_id() as i64;
        Self::replace_roles(&mut tx, id, &account.roles).await?;

        tx.commit()
            .await
            .map_err(|e| Self::db_error("Transaction commit failed", e))?;

        tracing::debug!(account_id = id, "account row inserted");

        let mut created = account;
        created.id = id;
        Ok(created)
    }

    async fn update(&self, account: Account) -> Result<Account, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Self::db_error("Transaction begin failed", e))?;

        let query = r#"
            UPDATE accounts
            SET username = ?, phone = ?, activated = ?, updated_at = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(&account.username)
            .bind(&account.phone)
            .bind(account.activated)
            .bind(account.updated_at)
            .bind(account.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| Self::db_error("Account update failed", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound {
                resource: "Account".to_string(),
            });
        }

        Self::replace_roles(&mut tx, account.id, &account.roles).await?;

        tx.commit()
            .await
            .map_err(|e| Self::db_error("Transaction commit failed", e))?;

        Ok(account)
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE accounts SET password = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::db_error("Password update failed", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound {
                resource: "Account".to_string(),
            });
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Self::db_error("Transaction begin failed", e))?;

        sqlx::query("DELETE FROM account_roles WHERE account_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| Self::db_error("Role cleanup failed", e))?;

        let result = sqlx::query("DELETE FROM accounts WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| Self::db_error("Account delete failed", e))?;

        tx.commit()
            .await
            .map_err(|e| Self::db_error("Transaction commit failed", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_page(
        &self,
        filter: &AccountFilter,
        pagination: &Pagination,
    ) -> Result<(Vec<Account>, u64), DomainError> {
        let mut where_sql = String::from(" WHERE 1 = 1");
        if filter.email.is_some() {
            where_sql.push_str(" AND email LIKE ?");
        }
        if filter.username.is_some() {
            where_sql.push_str(" AND username LIKE ?");
        }
        if filter.activated.is_some() {
            where_sql.push_str(" AND activated = ?");
        }

        // total count for the filter
        let count_sql = format!("SELECT COUNT(*) AS cnt FROM accounts{}", where_sql);
        let mut count_query = sqlx::query(&count_sql);
        if let Some(ref email) = filter.email {
            count_query = count_query.bind(format!("%{}%", email));
        }
        if let Some(ref username) = filter.username {
            count_query = count_query.bind(format!("%{}%", username));
        }
        if let Some(activated) = filter.activated {
            count_query = count_query.bind(activated);
        }

        let count_row = count_query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Self::db_error("Count query failed", e))?;
        let total: i64 = count_row
            .try_get("cnt")
            .map_err(|e| Self::db_error("Failed to get count", e))?;

        // the page itself, newest first
        let page_sql = format!(
            "SELECT id, username, email, password, phone, activated, \
             created_at, updated_at FROM accounts{} \
             ORDER BY id DESC LIMIT ? OFFSET ?",
            where_sql
        );
        let mut page_query = sqlx::query(&page_sql);
        if let Some(ref email) = filter.email {
            page_query = page_query.bind(format!("%{}%", email));
        }
        if let Some(ref username) = filter.username {
            page_query = page_query.bind(format!("%{}%", username));
        }
        if let Some(activated) = filter.activated {
            page_query = page_query.bind(activated);
        }
        page_query = page_query
            .bind(pagination.limit_i64())
            .bind(pagination.offset_i64());

        let rows = page_query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Self::db_error("Page query failed", e))?;

        let mut accounts = Vec::with_capacity(rows.len());
        for row in rows {
            let mut account = Self::row_to_account(&row)?;
            account.roles = self.fetch_roles(account.id).await?;
            accounts.push(account);
        }

        Ok((accounts, total as u64))
    }
}
