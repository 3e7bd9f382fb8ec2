//! Authentication and token error types with fixed user-facing messages.
//!
//! All variants are non-retryable client-facing authentication failures.

use thiserror::Error;

/// Token validation and issuance errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Invalid JWT signature")]
    InvalidSignature,

    #[error("Expired JWT token")]
    TokenExpired,

    #[error("Unsupported JWT token")]
    UnsupportedToken,

    #[error("Malformed JWT token")]
    MalformedToken,

    #[error("Token carries no authorities claim")]
    MissingAuthorities,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

/// Authentication errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account is not activated")]
    AccountInactive,

    #[error("Account not found")]
    AccountNotFound,

    #[error("Email already registered")]
    EmailAlreadyRegistered,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DomainError;

    #[test]
    fn test_fixed_messages() {
        assert_eq!(
            TokenError::InvalidSignature.to_string(),
            "Invalid JWT signature"
        );
        assert_eq!(TokenError::TokenExpired.to_string(), "Expired JWT token");
        assert_eq!(
            AuthError::AccountInactive.to_string(),
            "Account is not activated"
        );
    }

    #[test]
    fn test_transparent_bridging() {
        let err: DomainError = TokenError::MalformedToken.into();
        assert_eq!(err.to_string(), "Malformed JWT token");

        let err: DomainError = AuthError::InvalidCredentials.into();
        assert_eq!(err.to_string(), "Invalid email or password");
    }
}
