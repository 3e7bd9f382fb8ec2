use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::account_dto::{AccountResponse, ModifyAccountRequest};
use crate::handlers::error_handler::{domain_error_response, validation_error_response};
use crate::routes::AppState;

use cm_core::repositories::AccountRepository;

/// Handler for PUT /api/v1/accounts/{id}
///
/// Applies a partial update; fields absent from the body are unchanged.
pub async fn modify<A>(
    state: web::Data<AppState<A>>,
    path: web::Path<i64>,
    request: web::Json<ModifyAccountRequest>,
) -> HttpResponse
where
    A: AccountRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    let changes = request.into_inner().into_changes();

    match state.accounts.modify_account(path.into_inner(), changes).await {
        Ok(account) => HttpResponse::Ok().json(AccountResponse::from(account)),
        Err(e) => domain_error_response(&e),
    }
}
