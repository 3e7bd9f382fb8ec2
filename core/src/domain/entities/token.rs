//! Token entities for JWT-based authentication.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

/// Grant type reported to clients for issued tokens
pub const BEARER_TYPE: &str = "bearer";

/// Claims structure for the JWT payload.
///
/// Access tokens carry subject and authorities; refresh tokens carry only
/// the expiry. Absent fields are omitted from the encoded payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account email)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Comma-joined granted role names
    #[serde(rename = "auth", skip_serializing_if = "Option::is_none")]
    pub authorities: Option<String>,

    /// Expiration timestamp (seconds since epoch)
    pub exp: i64,
}

impl Claims {
    /// Creates claims for an access token expiring `ttl_seconds` from now
    pub fn new_access_token(
        subject: impl Into<String>,
        authorities: impl Into<String>,
        ttl_seconds: i64,
    ) -> Self {
        Self {
            sub: Some(subject.into()),
            authorities: Some(authorities.into()),
            exp: (Utc::now() + Duration::seconds(ttl_seconds)).timestamp(),
        }
    }

    /// Creates claims for a refresh token expiring `ttl_seconds` from now.
    ///
    /// Carries no subject and no authorities.
    pub fn new_refresh_token(ttl_seconds: i64) -> Self {
        Self {
            sub: None,
            authorities: None,
            exp: (Utc::now() + Duration::seconds(ttl_seconds)).timestamp(),
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Splits the authorities claim into individual role names
    pub fn authority_names(&self) -> Option<Vec<&str>> {
        self.authorities
            .as_deref()
            .map(|joined| joined.split(',').filter(|s| !s.is_empty()).collect())
    }
}

/// Token pair returned to the client at login. Immutable once issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedToken {
    /// Grant type, always `"bearer"`
    pub token_type: String,

    /// Signed JWT access token
    pub access_token: String,

    /// Access token expiry (seconds since epoch)
    pub access_token_expires_at: i64,

    /// Signed JWT refresh token
    pub refresh_token: String,

    /// Subject the tokens were issued for
    pub email: String,
}

impl IssuedToken {
    /// Creates a new issued token pair
    pub fn new(
        access_token: String,
        access_token_expires_at: i64,
        refresh_token: String,
        email: String,
    ) -> Self {
        Self {
            token_type: BEARER_TYPE.to_string(),
            access_token,
            access_token_expires_at,
            refresh_token,
            email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_claims() {
        let claims = Claims::new_access_token("song@commerce.io", "ROLE_USER,ROLE_ADMIN", 1800);

        assert_eq!(claims.sub.as_deref(), Some("song@commerce.io"));
        assert_eq!(
            claims.authority_names(),
            Some(vec!["ROLE_USER", "ROLE_ADMIN"])
        );
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_refresh_token_claims_carry_only_expiry() {
        let claims = Claims::new_refresh_token(604800);

        assert_eq!(claims.sub, None);
        assert_eq!(claims.authorities, None);
        assert!(!claims.is_expired());

        // absent fields must not appear in the payload
        let json = serde_json::to_string(&claims).unwrap();
        assert!(!json.contains("sub"));
        assert!(!json.contains("auth"));
    }

    #[test]
    fn test_claims_expiration() {
        let mut claims = Claims::new_access_token("a@b.c", "ROLE_USER", 60);
        claims.exp = Utc::now().timestamp() - 1;
        assert!(claims.is_expired());
    }

    #[test]
    fn test_issued_token_is_bearer() {
        let token = IssuedToken::new(
            "access".to_string(),
            1_900_000_000,
            "refresh".to_string(),
            "song@commerce.io".to_string(),
        );

        assert_eq!(token.token_type, BEARER_TYPE);
        assert_eq!(token.email, "song@commerce.io");
    }

    #[test]
    fn test_claims_roundtrip() {
        let claims = Claims::new_access_token("a@b.c", "ROLE_USER", 60);
        let json = serde_json::to_string(&claims).unwrap();
        let decoded: Claims = serde_json::from_str(&json).unwrap();
        assert_eq!(claims, decoded);
    }
}
