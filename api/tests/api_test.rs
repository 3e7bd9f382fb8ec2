//! End-to-end API tests running the full app against the in-memory
//! account repository.

use actix_web::{http::StatusCode, test, web};
use std::sync::Arc;

use cm_api::app::create_app;
use cm_api::middleware::auth::TokenAuthenticator;
use cm_api::routes::AppState;
use cm_core::repositories::MockAccountRepository;
use cm_core::services::{AccountService, AuthService, TokenConfig, TokenService};

type StateData = web::Data<AppState<MockAccountRepository>>;
type AuthData = web::Data<Arc<dyn TokenAuthenticator>>;

fn build_services() -> (StateData, AuthData) {
    let repository = Arc::new(MockAccountRepository::new());
    let token_service = Arc::new(
        TokenService::new(Arc::clone(&repository), TokenConfig::default())
            .expect("default secret is valid base64"),
    );
    let account_service = Arc::new(AccountService::new(Arc::clone(&repository)));
    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&repository),
        Arc::clone(&token_service),
    ));
    let authenticator: Arc<dyn TokenAuthenticator> = token_service;

    (
        web::Data::new(AppState {
            accounts: account_service,
            auth: auth_service,
        }),
        web::Data::new(authenticator),
    )
}

fn register_payload(username: &str, email: &str, phone: &str) -> serde_json::Value {
    serde_json::json!({
        "username": username,
        "email": email,
        "password": "hunter22",
        "phone": phone,
    })
}

#[actix_rt::test]
async fn health_endpoint_reports_healthy() {
    let (state, authenticator) = build_services();
    let app = test::init_service(create_app(state, authenticator)).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
}

#[actix_rt::test]
async fn unknown_route_returns_404() {
    let (state, authenticator) = build_services();
    let app = test::init_service(create_app(state, authenticator)).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/nothing").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn register_login_me_flow() {
    let (state, authenticator) = build_services();
    let app = test::init_service(create_app(state, authenticator)).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/accounts")
            .set_json(register_payload("song", "song@commerce.io", "01012345678"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let created: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(created["email"], "song@commerce.io");
    assert!(created["password"].is_null());
    assert_eq!(created["roles"][0], "ROLE_USER");

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(serde_json::json!({
                "email": "song@commerce.io",
                "password": "hunter22",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let tokens: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(tokens["token_type"], "bearer");
    let access_token = tokens["access_token"].as_str().unwrap().to_string();

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/accounts/me")
            .insert_header(("Authorization", format!("Bearer {}", access_token)))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let me: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(me["email"], "song@commerce.io");
    assert_eq!(me["id"], created["id"]);
}

#[actix_rt::test]
async fn me_without_token_is_unauthorized() {
    let (state, authenticator) = build_services();
    let app = test::init_service(create_app(state, authenticator)).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/accounts/me").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn me_with_garbage_token_is_unauthorized() {
    let (state, authenticator) = build_services();
    let app = test::init_service(create_app(state, authenticator)).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/accounts/me")
            .insert_header(("Authorization", "Bearer not.a.jwt"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn duplicate_registration_is_conflict() {
    let (state, authenticator) = build_services();
    let app = test::init_service(create_app(state, authenticator)).await;

    let payload = register_payload("song", "song@commerce.io", "01012345678");

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/accounts")
            .set_json(payload.clone())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/accounts")
            .set_json(payload)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "CONFLICT");
}

#[actix_rt::test]
async fn registration_validates_request_body() {
    let (state, authenticator) = build_services();
    let app = test::init_service(create_app(state, authenticator)).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/accounts")
            .set_json(register_payload("song", "not-an-email", "123"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[actix_rt::test]
async fn login_with_wrong_password_is_unauthorized() {
    let (state, authenticator) = build_services();
    let app = test::init_service(create_app(state, authenticator)).await;

    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/accounts")
            .set_json(register_payload("song", "song@commerce.io", "01012345678"))
            .to_request(),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(serde_json::json!({
                "email": "song@commerce.io",
                "password": "wrong-password",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn check_phone_reports_duplicates() {
    let (state, authenticator) = build_services();
    let app = test::init_service(create_app(state, authenticator)).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/accounts/check-phone?phone=01012345678")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["duplicate"], false);

    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/accounts")
            .set_json(register_payload("song", "song@commerce.io", "01012345678"))
            .to_request(),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/accounts/check-phone?phone=01012345678")
            .to_request(),
    )
    .await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["duplicate"], true);
}

#[actix_rt::test]
async fn account_recovery_flow() {
    let (state, authenticator) = build_services();
    let app = test::init_service(create_app(state, authenticator)).await;

    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/accounts")
            .set_json(register_payload("song", "song@commerce.io", "01012345678"))
            .to_request(),
    )
    .await;

    // recover the email from username + phone
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/accounts/find-email")
            .set_json(serde_json::json!({
                "username": "song",
                "phone": "01012345678",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["email"], "song@commerce.io");

    // reset the password, then login with the recovery password
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/accounts/reset-password")
            .set_json(serde_json::json!({
                "email": "song@commerce.io",
                "phone": "01012345678",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(serde_json::json!({
                "email": "song@commerce.io",
                "password": "1111",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn modify_list_and_delete_with_token() {
    let (state, authenticator) = build_services();
    let app = test::init_service(create_app(state, authenticator)).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/accounts")
            .set_json(register_payload("song", "song@commerce.io", "01012345678"))
            .to_request(),
    )
    .await;
    let created: serde_json::Value = test::read_body_json(resp).await;
    let id = created["id"].as_i64().unwrap();

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(serde_json::json!({
                "email": "song@commerce.io",
                "password": "hunter22",
            }))
            .to_request(),
    )
    .await;
    let tokens: serde_json::Value = test::read_body_json(resp).await;
    let bearer = format!("Bearer {}", tokens["access_token"].as_str().unwrap());

    // list requires the token and contains the account
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/accounts?page=1&per_page=10")
            .insert_header(("Authorization", bearer.clone()))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["data"][0]["id"], id);

    // rename via partial update
    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/accounts/{}", id))
            .insert_header(("Authorization", bearer.clone()))
            .set_json(serde_json::json!({ "username": "renamed" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let modified: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(modified["username"], "renamed");
    assert_eq!(modified["email"], "song@commerce.io");

    // delete and verify it is gone
    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/accounts/{}", id))
            .insert_header(("Authorization", bearer.clone()))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/accounts/{}", id))
            .insert_header(("Authorization", bearer))
            .to_request(),
    )
    .await;
    // the caller's account no longer exists, so the token is rejected
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn deactivated_account_is_forbidden() {
    let (state, authenticator) = build_services();
    let app = test::init_service(create_app(state, authenticator)).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/accounts")
            .set_json(register_payload("song", "song@commerce.io", "01012345678"))
            .to_request(),
    )
    .await;
    let created: serde_json::Value = test::read_body_json(resp).await;
    let id = created["id"].as_i64().unwrap();

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(serde_json::json!({
                "email": "song@commerce.io",
                "password": "hunter22",
            }))
            .to_request(),
    )
    .await;
    let tokens: serde_json::Value = test::read_body_json(resp).await;
    let bearer = format!("Bearer {}", tokens["access_token"].as_str().unwrap());

    // deactivate the account
    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/accounts/{}", id))
            .insert_header(("Authorization", bearer.clone()))
            .set_json(serde_json::json!({ "activated": false }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    // the still-valid token is now rejected with 403
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/accounts/me")
            .insert_header(("Authorization", bearer))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // and so is a fresh login
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(serde_json::json!({
                "email": "song@commerce.io",
                "password": "hunter22",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
