//! JWT authentication middleware for protecting API endpoints.
//!
//! Extracts the bearer token from the Authorization header, resolves it
//! through the token service, and injects the authenticated account
//! context into the request extensions.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::{ErrorForbidden, ErrorUnauthorized},
    http::header::AUTHORIZATION,
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use async_trait::async_trait;
use futures_util::future::LocalBoxFuture;
use std::collections::HashSet;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};

use cm_core::domain::entities::account::AccountPrincipal;
use cm_core::errors::{AuthError, DomainError};
use cm_core::repositories::AccountRepository;
use cm_core::services::token::TokenService;

/// Authenticated account context injected into requests.
///
/// Carries everything handlers need about the caller; the password hash
/// from the principal is deliberately not retained.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Account id of the caller
    pub account_id: i64,
    /// Email the token was issued for
    pub email: String,
    /// Role names granted to the account
    pub roles: HashSet<String>,
}

impl From<AccountPrincipal> for AuthContext {
    fn from(principal: AccountPrincipal) -> Self {
        Self {
            account_id: principal.id,
            email: principal.email,
            roles: principal.roles,
        }
    }
}

/// Trait wrapping the token service to allow dynamic dispatch from the
/// middleware, which cannot be generic over the repository type
#[async_trait]
pub trait TokenAuthenticator: Send + Sync {
    async fn authenticate(&self, access_token: &str) -> Result<AccountPrincipal, DomainError>;
}

#[async_trait]
impl<A: AccountRepository + 'static> TokenAuthenticator for TokenService<A> {
    async fn authenticate(&self, access_token: &str) -> Result<AccountPrincipal, DomainError> {
        TokenService::authenticate(self, access_token).await
    }
}

/// JWT authentication middleware factory
#[derive(Default)]
pub struct JwtAuth;

impl JwtAuth {
    /// Creates a new JWT authentication middleware
    pub fn new() -> Self {
        Self
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let token = match extract_bearer_token(&req) {
                Some(token) => token,
                None => {
                    return Ok(req
                        .error_response(ErrorUnauthorized(
                            "Missing or invalid Authorization header",
                        ))
                        .map_into_right_body());
                }
            };

            let authenticator = match req
                .app_data::<web::Data<Arc<dyn TokenAuthenticator>>>()
                .cloned()
            {
                Some(authenticator) => authenticator,
                None => {
                    return Ok(req
                        .error_response(ErrorUnauthorized("Token verification not configured"))
                        .map_into_right_body());
                }
            };

            let principal = match authenticator.authenticate(&token).await {
                Ok(principal) => principal,
                Err(error) => {
                    return Ok(req.error_response(auth_failure(error)).map_into_right_body());
                }
            };

            req.extensions_mut().insert(AuthContext::from(principal));

            service
                .call(req)
                .await
                .map(ServiceResponse::map_into_left_body)
        })
    }
}

/// Maps a failed token resolution onto an actix error; inactive accounts
/// are a 403, everything else a 401
fn auth_failure(error: DomainError) -> Error {
    match &error {
        DomainError::Auth(AuthError::AccountInactive) => ErrorForbidden(error.to_string()),
        _ => ErrorUnauthorized(error.to_string()),
    }
}

/// Extracts Bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.to_string())
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ErrorUnauthorized("Authentication required"));

        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_extract_bearer_token() {
        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer token_abc123"))
            .to_srv_request();
        assert_eq!(extract_bearer_token(&req), Some("token_abc123".to_string()));

        let req_no_bearer = TestRequest::default()
            .insert_header((AUTHORIZATION, "token_abc123"))
            .to_srv_request();
        assert_eq!(extract_bearer_token(&req_no_bearer), None);

        let req_no_header = TestRequest::default().to_srv_request();
        assert_eq!(extract_bearer_token(&req_no_header), None);
    }

    #[test]
    fn test_auth_context_drops_password() {
        let mut roles = HashSet::new();
        roles.insert("ROLE_USER".to_string());

        let principal = AccountPrincipal {
            id: 7,
            email: "song@commerce.io".to_string(),
            password: "$2b$12$hash".to_string(),
            roles,
        };

        let context = AuthContext::from(principal);
        assert_eq!(context.account_id, 7);
        assert_eq!(context.email, "song@commerce.io");
        assert!(context.roles.contains("ROLE_USER"));
    }
}
