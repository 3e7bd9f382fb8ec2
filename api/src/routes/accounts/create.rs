use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::account_dto::{AccountResponse, CreateAccountRequest};
use crate::handlers::error_handler::{domain_error_response, validation_error_response};
use crate::routes::AppState;

use cm_core::repositories::AccountRepository;
use cm_core::services::account::NewAccount;

/// Handler for POST /api/v1/accounts
///
/// Registers a new account. The password is bcrypt-hashed before it is
/// persisted and the default role is granted.
pub async fn create<A>(
    state: web::Data<AppState<A>>,
    request: web::Json<CreateAccountRequest>,
) -> HttpResponse
where
    A: AccountRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    let request = request.into_inner();
    let new_account = NewAccount {
        username: request.username,
        email: request.email,
        password: request.password,
        phone: request.phone,
    };

    match state.accounts.create_account(new_account).await {
        Ok(account) => HttpResponse::Created().json(AccountResponse::from(account)),
        Err(e) => domain_error_response(&e),
    }
}
