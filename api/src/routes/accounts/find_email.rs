use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::account_dto::{FindEmailRequest, FindEmailResponse};
use crate::handlers::error_handler::{domain_error_response, validation_error_response};
use crate::routes::AppState;

use cm_core::repositories::AccountRepository;

/// Handler for POST /api/v1/accounts/find-email
///
/// Resolves the login email from username + phone for account recovery.
pub async fn find_email<A>(
    state: web::Data<AppState<A>>,
    request: web::Json<FindEmailRequest>,
) -> HttpResponse
where
    A: AccountRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    match state
        .accounts
        .find_email(&request.username, &request.phone)
        .await
    {
        Ok(email) => HttpResponse::Ok().json(FindEmailResponse { email }),
        Err(e) => domain_error_response(&e),
    }
}
