use actix_web::{web, HttpResponse};

use crate::dto::account_dto::{AccountResponse, ListAccountsQuery};
use crate::handlers::error_handler::domain_error_response;
use crate::routes::AppState;

use cm_core::repositories::{AccountFilter, AccountRepository};
use cm_shared::types::Pagination;

/// Handler for GET /api/v1/accounts
///
/// Returns one page of accounts, newest first, optionally filtered by
/// email, username, or activation state.
pub async fn list<A>(
    state: web::Data<AppState<A>>,
    query: web::Query<ListAccountsQuery>,
) -> HttpResponse
where
    A: AccountRepository + 'static,
{
    let query = query.into_inner();

    let pagination = Pagination::new(query.page.unwrap_or(1), query.per_page.unwrap_or(20));
    let filter = AccountFilter {
        email: query.email,
        username: query.username,
        activated: query.activated,
    };

    match state.accounts.list_accounts(filter, pagination).await {
        Ok(page) => HttpResponse::Ok().json(page.map(AccountResponse::from)),
        Err(e) => domain_error_response(&e),
    }
}
