//! Tests for the account service

use std::sync::Arc;

use crate::domain::entities::account::DEFAULT_ROLE;
use crate::errors::{AuthError, DomainError};
use crate::repositories::{AccountFilter, MockAccountRepository};
use crate::services::account::{AccountChanges, AccountService, NewAccount, RESET_PASSWORD};
use cm_shared::types::Pagination;

fn new_account(username: &str, email: &str, phone: &str) -> NewAccount {
    NewAccount {
        username: username.to_string(),
        email: email.to_string(),
        password: "secret-password".to_string(),
        phone: phone.to_string(),
    }
}

fn service() -> AccountService<MockAccountRepository> {
    AccountService::new(Arc::new(MockAccountRepository::new()))
}

#[tokio::test]
async fn test_create_account_hashes_password_and_grants_default_role() {
    let service = service();

    let account = service
        .create_account(new_account("song", "song@commerce.io", "01011112222"))
        .await
        .unwrap();

    assert!(account.id > 0);
    assert!(account.activated);
    assert!(account.has_role(DEFAULT_ROLE));
    assert_ne!(account.password, "secret-password");
    assert!(bcrypt::verify("secret-password", &account.password).unwrap());
}

#[tokio::test]
async fn test_create_account_rejects_duplicate_email() {
    let service = service();
    service
        .create_account(new_account("song", "song@commerce.io", "01011112222"))
        .await
        .unwrap();

    match service
        .create_account(new_account("other", "song@commerce.io", "01033334444"))
        .await
    {
        Err(DomainError::Auth(AuthError::EmailAlreadyRegistered)) => {}
        other => panic!("expected EmailAlreadyRegistered, got {:?}", other),
    }
}

#[tokio::test]
async fn test_modify_account_applies_partial_changes() {
    let service = service();
    let created = service
        .create_account(new_account("song", "song@commerce.io", "01011112222"))
        .await
        .unwrap();

    let modified = service
        .modify_account(
            created.id,
            AccountChanges {
                username: Some("song2".to_string()),
                activated: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(modified.username, "song2");
    assert_eq!(modified.phone, created.phone);
    assert!(!modified.activated);
}

#[tokio::test]
async fn test_list_accounts_paginates() {
    let service = service();
    for i in 0..7 {
        service
            .create_account(new_account(
                &format!("user{}", i),
                &format!("user{}@commerce.io", i),
                &format!("0101111{:04}", i),
            ))
            .await
            .unwrap();
    }

    let page = service
        .list_accounts(AccountFilter::default(), Pagination::new(2, 3))
        .await
        .unwrap();

    assert_eq!(page.total, 7);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.data.len(), 3);
}

#[tokio::test]
async fn test_phone_duplicate_and_find_email() {
    let service = service();
    service
        .create_account(new_account("song", "song@commerce.io", "01011112222"))
        .await
        .unwrap();

    assert!(service.check_phone_duplicate("01011112222").await.unwrap());
    assert!(!service.check_phone_duplicate("01000000000").await.unwrap());

    let email = service.find_email("song", "01011112222").await.unwrap();
    assert_eq!(email, "song@commerce.io");

    match service.find_email("song", "01000000000").await {
        Err(DomainError::Auth(AuthError::AccountNotFound)) => {}
        other => panic!("expected AccountNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_reset_password_sets_recovery_password() {
    let service = service();
    let created = service
        .create_account(new_account("song", "song@commerce.io", "01011112222"))
        .await
        .unwrap();

    let reset_id = service
        .reset_password("song@commerce.io", "01011112222")
        .await
        .unwrap();
    assert_eq!(reset_id, created.id);

    let reloaded = service.get_account(created.id).await.unwrap();
    assert!(bcrypt::verify(RESET_PASSWORD, &reloaded.password).unwrap());
}

#[tokio::test]
async fn test_reset_password_requires_matching_phone() {
    let service = service();
    service
        .create_account(new_account("song", "song@commerce.io", "01011112222"))
        .await
        .unwrap();

    match service.reset_password("song@commerce.io", "01099999999").await {
        Err(DomainError::Auth(AuthError::AccountNotFound)) => {}
        other => panic!("expected AccountNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_delete_account_not_found() {
    let service = service();
    match service.delete_account(999).await {
        Err(DomainError::NotFound { .. }) => {}
        other => panic!("expected NotFound, got {:?}", other),
    }
}
