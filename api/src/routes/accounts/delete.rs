use actix_web::{web, HttpResponse};

use crate::handlers::error_handler::domain_error_response;
use crate::routes::AppState;

use cm_core::repositories::AccountRepository;

/// Handler for DELETE /api/v1/accounts/{id}
pub async fn delete<A>(state: web::Data<AppState<A>>, path: web::Path<i64>) -> HttpResponse
where
    A: AccountRepository + 'static,
{
    match state.accounts.delete_account(path.into_inner()).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => domain_error_response(&e),
    }
}
