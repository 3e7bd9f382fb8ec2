use actix_web::{web, HttpResponse};

use crate::dto::account_dto::AccountResponse;
use crate::handlers::error_handler::domain_error_response;
use crate::routes::AppState;

use cm_core::repositories::AccountRepository;

/// Handler for GET /api/v1/accounts/{id}
pub async fn get<A>(state: web::Data<AppState<A>>, path: web::Path<i64>) -> HttpResponse
where
    A: AccountRepository + 'static,
{
    match state.accounts.get_account(path.into_inner()).await {
        Ok(account) => HttpResponse::Ok().json(AccountResponse::from(account)),
        Err(e) => domain_error_response(&e),
    }
}
