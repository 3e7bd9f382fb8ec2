//! Authentication service implementation

use std::sync::Arc;

use crate::domain::entities::token::IssuedToken;
use crate::errors::{AuthError, DomainError};
use crate::repositories::AccountRepository;
use crate::services::token::TokenService;

/// Service authenticating credentials and minting token pairs
pub struct AuthService<A: AccountRepository> {
    accounts: Arc<A>,
    tokens: Arc<TokenService<A>>,
}

impl<A: AccountRepository> AuthService<A> {
    /// Creates a new authentication service
    pub fn new(accounts: Arc<A>, tokens: Arc<TokenService<A>>) -> Self {
        Self { accounts, tokens }
    }

    /// Authenticates email + password and issues a token pair
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidCredentials` - unknown email or wrong password
    /// * `AuthError::AccountInactive` - account exists but is deactivated
    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedToken, DomainError> {
        let account = self
            .accounts
            .find_by_email(email)
            .await?
            .ok_or(DomainError::Auth(AuthError::InvalidCredentials))?;

        let password_matches =
            bcrypt::verify(password, &account.password).map_err(|_| DomainError::Internal {
                message: "Password verification failed".to_string(),
            })?;
        if !password_matches {
            tracing::info!(email, "login rejected: wrong password");
            return Err(DomainError::Auth(AuthError::InvalidCredentials));
        }

        if !account.activated {
            tracing::info!(email, "login rejected: account inactive");
            return Err(DomainError::Auth(AuthError::AccountInactive));
        }

        let issued = self.tokens.issue_tokens(&account.email, &account.roles)?;
        tracing::info!(account_id = account.id, "login succeeded");
        Ok(issued)
    }
}
