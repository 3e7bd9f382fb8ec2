//! Maps domain errors onto HTTP status codes and error response bodies.
//!
//! Token failures and bad credentials are 401, inactive accounts 403,
//! unknown resources 404, duplicate registrations 409. Database and
//! internal failures are logged server-side and surface as a generic 500.

use actix_web::HttpResponse;
use validator::ValidationErrors;

use cm_core::errors::{AuthError, DomainError, TokenError};
use cm_shared::errors::{error_codes, ErrorResponse};

/// Convert a domain error into the matching HTTP error response
pub fn domain_error_response(error: &DomainError) -> HttpResponse {
    match error {
        DomainError::Token(token_error) => token_error_response(token_error),
        DomainError::Auth(auth_error) => auth_error_response(auth_error),
        DomainError::Validation { message } => HttpResponse::BadRequest()
            .json(ErrorResponse::new(error_codes::VALIDATION_ERROR, message)),
        DomainError::NotFound { resource } => HttpResponse::NotFound().json(ErrorResponse::new(
            error_codes::NOT_FOUND,
            format!("{} not found", resource),
        )),
        DomainError::Database { message } => {
            log::error!("database error: {}", message);
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                error_codes::DATABASE_ERROR,
                "A database error occurred",
            ))
        }
        DomainError::Internal { message } => {
            log::error!("internal error: {}", message);
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                error_codes::INTERNAL_ERROR,
                "An internal error occurred",
            ))
        }
    }
}

fn token_error_response(error: &TokenError) -> HttpResponse {
    let code = match error {
        TokenError::TokenExpired => error_codes::TOKEN_EXPIRED,
        _ => error_codes::TOKEN_INVALID,
    };
    HttpResponse::Unauthorized().json(ErrorResponse::new(code, error.to_string()))
}

fn auth_error_response(error: &AuthError) -> HttpResponse {
    match error {
        AuthError::InvalidCredentials => HttpResponse::Unauthorized().json(ErrorResponse::new(
            error_codes::UNAUTHORIZED,
            error.to_string(),
        )),
        AuthError::AccountInactive => HttpResponse::Forbidden().json(ErrorResponse::new(
            error_codes::ACCOUNT_INACTIVE,
            error.to_string(),
        )),
        AuthError::AccountNotFound => HttpResponse::NotFound().json(ErrorResponse::new(
            error_codes::NOT_FOUND,
            error.to_string(),
        )),
        AuthError::EmailAlreadyRegistered => HttpResponse::Conflict().json(ErrorResponse::new(
            error_codes::CONFLICT,
            error.to_string(),
        )),
    }
}

/// Convert request body validation failures into a 400 with per-field details
pub fn validation_error_response(errors: &ValidationErrors) -> HttpResponse {
    let mut response = ErrorResponse::new(error_codes::VALIDATION_ERROR, "Request validation failed");

    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        response = response.add_detail(field, messages);
    }

    HttpResponse::BadRequest().json(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_token_errors_are_unauthorized() {
        let expired = domain_error_response(&DomainError::Token(TokenError::TokenExpired));
        assert_eq!(expired.status(), StatusCode::UNAUTHORIZED);

        let forged = domain_error_response(&DomainError::Token(TokenError::InvalidSignature));
        assert_eq!(forged.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_auth_error_status_codes() {
        let cases = [
            (AuthError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AuthError::AccountInactive, StatusCode::FORBIDDEN),
            (AuthError::AccountNotFound, StatusCode::NOT_FOUND),
            (AuthError::EmailAlreadyRegistered, StatusCode::CONFLICT),
        ];

        for (error, expected) in cases {
            let response = domain_error_response(&DomainError::Auth(error));
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let response = domain_error_response(&DomainError::Database {
            message: "connection refused to mysql://secret-host".to_string(),
        });
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_not_found_names_the_resource() {
        let response = domain_error_response(&DomainError::NotFound {
            resource: "Account".to_string(),
        });
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
