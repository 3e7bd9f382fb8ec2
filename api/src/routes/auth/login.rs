use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::auth_dto::{LoginRequest, TokenResponse};
use crate::handlers::error_handler::{domain_error_response, validation_error_response};
use crate::routes::AppState;

use cm_core::repositories::AccountRepository;

/// Handler for POST /api/v1/auth/login
///
/// Verifies email + password and returns an access/refresh token pair.
pub async fn login<A>(
    state: web::Data<AppState<A>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    A: AccountRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    match state.auth.login(&request.email, &request.password).await {
        Ok(issued) => HttpResponse::Ok().json(TokenResponse::from(issued)),
        Err(e) => domain_error_response(&e),
    }
}
