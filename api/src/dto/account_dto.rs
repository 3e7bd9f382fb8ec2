use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use cm_core::domain::entities::account::Account;
use cm_core::services::account::AccountChanges;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAccountRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 4, max = 100))]
    pub password: String,
    #[validate(length(min = 10, max = 15))]
    pub phone: String,
}

/// Account representation returned to clients; never carries the
/// password hash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub activated: bool,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        let mut roles: Vec<String> = account.roles.into_iter().collect();
        roles.sort_unstable();

        Self {
            id: account.id,
            username: account.username,
            email: account.email,
            phone: account.phone,
            activated: account.activated,
            roles,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

/// Partial account update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ModifyAccountRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: Option<String>,
    #[validate(length(min = 10, max = 15))]
    pub phone: Option<String>,
    pub activated: Option<bool>,
}

impl ModifyAccountRequest {
    pub fn into_changes(self) -> AccountChanges {
        AccountChanges {
            username: self.username,
            phone: self.phone,
            activated: self.activated,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListAccountsQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub activated: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckPhoneQuery {
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckPhoneResponse {
    pub phone: String,
    pub duplicate: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindEmailRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    #[validate(length(min = 10, max = 15))]
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindEmailResponse {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 10, max = 15))]
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordResponse {
    pub account_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_account_request_validation() {
        let valid = CreateAccountRequest {
            username: "song".to_string(),
            email: "song@commerce.io".to_string(),
            password: "secret".to_string(),
            phone: "01012345678".to_string(),
        };
        assert!(valid.validate().is_ok());

        let short_phone = CreateAccountRequest {
            phone: "123".to_string(),
            ..valid.clone()
        };
        assert!(short_phone.validate().is_err());

        let bad_email = CreateAccountRequest {
            email: "nope".to_string(),
            ..valid
        };
        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn test_account_response_omits_password() {
        let account = Account::new(
            "song".to_string(),
            "song@commerce.io".to_string(),
            "$2b$12$hash".to_string(),
            "01012345678".to_string(),
        );

        let response = AccountResponse::from(account);
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("$2b$12$hash"));
        assert_eq!(response.roles, vec!["ROLE_USER".to_string()]);
    }

    #[test]
    fn test_modify_request_into_changes() {
        let request = ModifyAccountRequest {
            username: Some("renamed".to_string()),
            phone: None,
            activated: Some(false),
        };

        let changes = request.into_changes();
        assert_eq!(changes.username.as_deref(), Some("renamed"));
        assert_eq!(changes.phone, None);
        assert_eq!(changes.activated, Some(false));
    }
}
