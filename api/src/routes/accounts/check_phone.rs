use actix_web::{web, HttpResponse};

use crate::dto::account_dto::{CheckPhoneQuery, CheckPhoneResponse};
use crate::handlers::error_handler::domain_error_response;
use crate::routes::AppState;

use cm_core::repositories::AccountRepository;

/// Handler for GET /api/v1/accounts/check-phone
///
/// Reports whether a phone number is already registered. Used by the
/// signup flow before submitting the registration form.
pub async fn check_phone<A>(
    state: web::Data<AppState<A>>,
    query: web::Query<CheckPhoneQuery>,
) -> HttpResponse
where
    A: AccountRepository + 'static,
{
    let phone = query.into_inner().phone;

    match state.accounts.check_phone_duplicate(&phone).await {
        Ok(duplicate) => HttpResponse::Ok().json(CheckPhoneResponse { phone, duplicate }),
        Err(e) => domain_error_response(&e),
    }
}
