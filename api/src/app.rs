//! Application factory
//!
//! Wires middleware, routes, and shared state into the Actix-web app.

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpResponse};

use crate::middleware::{auth::JwtAuth, auth::TokenAuthenticator, cors::create_cors};
use crate::routes::accounts::{
    check_phone::check_phone, create::create, delete::delete, find_email::find_email, get::get,
    list::list, me::me, modify::modify, reset_password::reset_password,
};
use crate::routes::auth::login::login;
use crate::routes::AppState;

use cm_core::repositories::AccountRepository;
use cm_shared::errors::{error_codes, ErrorResponse};

/// Create and configure the application with all dependencies.
///
/// Registration, login, and the account recovery endpoints are public;
/// everything else requires a bearer token.
pub fn create_app<A>(
    app_state: web::Data<AppState<A>>,
    authenticator: web::Data<Arc<dyn TokenAuthenticator>>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    A: AccountRepository + 'static,
{
    let cors = create_cors();

    App::new()
        .app_data(app_state)
        .app_data(authenticator)
        .wrap(Logger::default())
        .wrap(cors)
        // Health check endpoint
        .route("/health", web::get().to(health_check))
        // API v1 routes
        .service(
            web::scope("/api/v1")
                .service(
                    web::scope("/auth").route("/login", web::post().to(login::<A>)),
                )
                .service(
                    web::scope("/accounts")
                        // literal paths are registered before /{id}
                        .route("/me", web::get().to(me::<A>).wrap(JwtAuth::new()))
                        .route("/check-phone", web::get().to(check_phone::<A>))
                        .route("/find-email", web::post().to(find_email::<A>))
                        .route("/reset-password", web::post().to(reset_password::<A>))
                        .route("", web::post().to(create::<A>))
                        .route("", web::get().to(list::<A>).wrap(JwtAuth::new()))
                        .route("/{id}", web::get().to(get::<A>).wrap(JwtAuth::new()))
                        .route("/{id}", web::put().to(modify::<A>).wrap(JwtAuth::new()))
                        .route("/{id}", web::delete().to(delete::<A>).wrap(JwtAuth::new())),
                ),
        )
        // Default 404 handler
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "commerce-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
