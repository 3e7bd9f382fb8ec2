use actix_web::{web, HttpResponse};

use crate::dto::account_dto::AccountResponse;
use crate::handlers::error_handler::domain_error_response;
use crate::middleware::auth::AuthContext;
use crate::routes::AppState;

use cm_core::repositories::AccountRepository;

/// Handler for GET /api/v1/accounts/me
///
/// Returns the account of the authenticated caller.
pub async fn me<A>(auth: AuthContext, state: web::Data<AppState<A>>) -> HttpResponse
where
    A: AccountRepository + 'static,
{
    match state.accounts.get_account(auth.account_id).await {
        Ok(account) => HttpResponse::Ok().json(AccountResponse::from(account)),
        Err(e) => domain_error_response(&e),
    }
}
