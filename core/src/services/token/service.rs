//! Main token service implementation

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::entities::account::AccountPrincipal;
use crate::domain::entities::token::{Claims, IssuedToken};
use crate::errors::{AuthError, DomainError, TokenError};
use crate::repositories::AccountRepository;

use super::config::TokenConfig;

/// Service issuing and validating HS512-signed JWTs.
///
/// The base64 secret is decoded into signing keys once at construction;
/// the service holds no mutable state afterwards and is safe to share.
pub struct TokenService<A: AccountRepository> {
    accounts: Arc<A>,
    config: TokenConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    // signature still verified, expiry ignored; used to inspect the
    // claims of an already-expired access token
    expired_tolerant_validation: Validation,
}

impl<A: AccountRepository> TokenService<A> {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `accounts` - Account repository for subject lookups
    /// * `config` - Token service configuration (base64 secret + TTLs)
    ///
    /// # Returns
    ///
    /// A new `TokenService`, or an error if the secret is not valid base64
    pub fn new(accounts: Arc<A>, config: TokenConfig) -> Result<Self, DomainError> {
        let encoding_key =
            EncodingKey::from_base64_secret(&config.secret).map_err(|_| DomainError::Internal {
                message: "JWT secret is not valid base64".to_string(),
            })?;
        let decoding_key =
            DecodingKey::from_base64_secret(&config.secret).map_err(|_| DomainError::Internal {
                message: "JWT secret is not valid base64".to_string(),
            })?;

        let validation = Validation::new(Algorithm::HS512);

        let mut expired_tolerant_validation = Validation::new(Algorithm::HS512);
        expired_tolerant_validation.validate_exp = false;

        Ok(Self {
            accounts,
            config,
            encoding_key,
            decoding_key,
            validation,
            expired_tolerant_validation,
        })
    }

    /// Issues an access/refresh token pair for an authenticated principal
    ///
    /// The access token embeds the subject and a comma-joined authorities
    /// claim; the refresh token carries only its expiry.
    ///
    /// # Arguments
    ///
    /// * `subject` - Principal name (account email)
    /// * `roles` - Granted role names
    pub fn issue_tokens(
        &self,
        subject: &str,
        roles: &HashSet<String>,
    ) -> Result<IssuedToken, DomainError> {
        let mut names: Vec<&str> = roles.iter().map(String::as_str).collect();
        names.sort_unstable();
        let authorities = names.join(",");

        let access_claims =
            Claims::new_access_token(subject, authorities, self.config.access_token_expiry);
        let refresh_claims = Claims::new_refresh_token(self.config.refresh_token_expiry);

        let access_token = self.encode_jwt(&access_claims)?;
        let refresh_token = self.encode_jwt(&refresh_claims)?;

        Ok(IssuedToken::new(
            access_token,
            access_claims.exp,
            refresh_token,
            subject.to_string(),
        ))
    }

    /// Verifies signature and expiry of a token
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - Token is well-formed, signed with our key, unexpired
    /// * `Err(DomainError)` - Typed validation failure; never a silent `false`
    pub fn validate(&self, token: &str) -> Result<bool, DomainError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            let kind = Self::map_jwt_error(&e);
            tracing::info!(error = %kind, "token validation failed");
            DomainError::Token(kind)
        })?;
        Ok(true)
    }

    /// Resolves an access token to an account principal
    ///
    /// Claims are extracted even from an expired token (the signature is
    /// still verified) so callers can inspect who the token belonged to.
    /// Fails if the authorities claim is absent, the subject is unknown,
    /// or the account is not activated.
    pub async fn authenticate(&self, access_token: &str) -> Result<AccountPrincipal, DomainError> {
        let claims = self.parse_claims(access_token)?;

        if claims.authorities.is_none() {
            return Err(DomainError::Token(TokenError::MissingAuthorities));
        }

        let subject = claims
            .sub
            .ok_or(DomainError::Token(TokenError::MalformedToken))?;

        let account = self
            .accounts
            .find_by_email(&subject)
            .await?
            .ok_or(DomainError::Auth(AuthError::AccountNotFound))?;

        if !account.activated {
            return Err(DomainError::Auth(AuthError::AccountInactive));
        }

        Ok(AccountPrincipal::from_account(&account))
    }

    /// Encodes claims into a signed JWT
    pub(crate) fn encode_jwt(&self, claims: &Claims) -> Result<String, DomainError> {
        let header = Header::new(Algorithm::HS512);
        encode(&header, claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))
    }

    /// Parses claims, tolerating an expired token
    fn parse_claims(&self, token: &str) -> Result<Claims, DomainError> {
        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Ok(data.claims),
            Err(e) if e.kind() == &jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                let data =
                    decode::<Claims>(token, &self.decoding_key, &self.expired_tolerant_validation)
                        .map_err(|e| DomainError::Token(Self::map_jwt_error(&e)))?;
                Ok(data.claims)
            }
            Err(e) => Err(DomainError::Token(Self::map_jwt_error(&e))),
        }
    }

    /// Maps jsonwebtoken failures onto our typed validation errors
    fn map_jwt_error(error: &jsonwebtoken::errors::Error) -> TokenError {
        use jsonwebtoken::errors::ErrorKind;

        match error.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::ExpiredSignature => TokenError::TokenExpired,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                TokenError::UnsupportedToken
            }
            _ => TokenError::MalformedToken,
        }
    }
}
