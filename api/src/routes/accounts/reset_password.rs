use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::account_dto::{ResetPasswordRequest, ResetPasswordResponse};
use crate::handlers::error_handler::{domain_error_response, validation_error_response};
use crate::routes::AppState;

use cm_core::repositories::AccountRepository;

/// Handler for POST /api/v1/accounts/reset-password
///
/// Resets the password of the account matching email + phone to the
/// fixed recovery password.
pub async fn reset_password<A>(
    state: web::Data<AppState<A>>,
    request: web::Json<ResetPasswordRequest>,
) -> HttpResponse
where
    A: AccountRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    match state
        .accounts
        .reset_password(&request.email, &request.phone)
        .await
    {
        Ok(account_id) => HttpResponse::Ok().json(ResetPasswordResponse { account_id }),
        Err(e) => domain_error_response(&e),
    }
}
