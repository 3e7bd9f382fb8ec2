use actix_web::{web, HttpServer};
use dotenvy::dotenv;
use log::info;
use std::sync::Arc;

use cm_api::app::create_app;
use cm_api::middleware::auth::TokenAuthenticator;
use cm_api::routes::AppState;
use cm_core::services::{AccountService, AuthService, TokenConfig, TokenService};
use cm_infra::{DatabasePool, MySqlAccountRepository};
use cm_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting Commerce API server");

    let config = AppConfig::from_env();
    if config.jwt.is_using_default_secret() {
        log::warn!("JWT_SECRET is not set; using the built-in development secret");
    }

    // Database pool and repository
    let pool = DatabasePool::new(&config.database)
        .await
        .map_err(to_io_error)?;
    let repository = Arc::new(MySqlAccountRepository::new(pool.get_pool().clone()));

    // Services
    let token_service = Arc::new(
        TokenService::new(Arc::clone(&repository), TokenConfig::from(config.jwt.clone()))
            .map_err(to_io_error)?,
    );
    let account_service = Arc::new(AccountService::new(Arc::clone(&repository)));
    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&repository),
        Arc::clone(&token_service),
    ));

    let authenticator: Arc<dyn TokenAuthenticator> = token_service;

    let bind_address = config.server.bind_address();
    let workers = config.server.workers;
    info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || {
        let state = web::Data::new(AppState {
            accounts: Arc::clone(&account_service),
            auth: Arc::clone(&auth_service),
        });
        create_app(state, web::Data::new(Arc::clone(&authenticator)))
    })
    .bind(&bind_address)?;

    if workers > 0 {
        server = server.workers(workers);
    }

    server.run().await
}

fn to_io_error(error: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, error.to_string())
}
