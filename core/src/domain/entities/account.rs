//! Account entity representing a registered account in the commerce system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Role granted to every newly registered account
pub const DEFAULT_ROLE: &str = "ROLE_USER";

/// Account entity representing a registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier for the account (database-generated)
    pub id: i64,

    /// Display name of the account holder
    pub username: String,

    /// Login identifier, unique across accounts
    pub email: String,

    /// Bcrypt hash of the account password
    pub password: String,

    /// Contact phone number
    pub phone: String,

    /// Whether the account is activated and allowed to authenticate
    pub activated: bool,

    /// Names of the roles granted to this account
    pub roles: HashSet<String>,

    /// Timestamp when the account was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the account was last updated
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Creates a new account with the default role, not yet persisted.
    ///
    /// The id is zero until the repository assigns one; `password` must
    /// already be hashed.
    pub fn new(
        username: String,
        email: String,
        password: String,
        phone: String,
    ) -> Self {
        let now = Utc::now();
        let mut roles = HashSet::new();
        roles.insert(DEFAULT_ROLE.to_string());

        Self {
            id: 0,
            username,
            email,
            password,
            phone,
            activated: true,
            roles,
            created_at: now,
            updated_at: now,
        }
    }

    /// Grants a role to the account
    pub fn grant_role(&mut self, role: impl Into<String>) {
        self.roles.insert(role.into());
        self.updated_at = Utc::now();
    }

    /// Deactivates the account
    pub fn deactivate(&mut self) {
        self.activated = false;
        self.updated_at = Utc::now();
    }

    /// Activates the account
    pub fn activate(&mut self) {
        self.activated = true;
        self.updated_at = Utc::now();
    }

    /// Checks if the account holds the given role
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

/// Authentication context resolved from a validated access token.
///
/// Injected into protected requests by the JWT middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountPrincipal {
    /// Account id
    pub id: i64,

    /// Account email (token subject)
    pub email: String,

    /// Bcrypt hash of the account password
    pub password: String,

    /// Names of the roles granted to the account
    pub roles: HashSet<String>,
}

impl AccountPrincipal {
    /// Builds a principal from an account record
    pub fn from_account(account: &Account) -> Self {
        Self {
            id: account.id,
            email: account.email.clone(),
            password: account.password.clone(),
            roles: account.roles.clone(),
        }
    }
}
