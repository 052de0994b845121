//! End-to-end authentication flow tests on the in-memory repository:
//! registration, credential verification, token issuance and resolution,
//! and ownership authorization.

use blogify::{
    auth::{authorize_owner, Decision, DenyReason, SessionService},
    error::AppError,
    models::user::{ChangePasswordRequest, CreateUserRequest},
    repository::UserRepository,
    services::AuthService,
};
use std::sync::Arc;

mod common;
use common::{create_test_config, InMemoryUserRepository};

fn build_service() -> (Arc<InMemoryUserRepository>, Arc<SessionService>, AuthService) {
    let config = Arc::new(create_test_config());
    let users = Arc::new(InMemoryUserRepository::new());
    let sessions = Arc::new(SessionService::from_config(&config).unwrap());
    let auth = AuthService::new(users.clone(), sessions.clone(), config);
    (users, sessions, auth)
}

fn signup_request(email: &str) -> CreateUserRequest {
    CreateUserRequest {
        full_name: "Ada Author".to_string(),
        email: email.to_string(),
        password: "password-one".to_string(),
        profile_image_url: None,
    }
}

#[tokio::test]
async fn test_register_stores_hash_not_plaintext() {
    let (users, _, auth) = build_service();

    let user = auth.register(signup_request("ada@example.com")).await.unwrap();

    assert_eq!(user.role, "USER");
    assert_eq!(user.profile_image_url, "/images/default.svg");
    assert_ne!(user.password_hash, "password-one");
    assert!(!user.password_hash.contains("password"));
    assert_eq!(user.salt.len(), 32);

    let stored = users.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(stored.password_hash, user.password_hash);
}

#[tokio::test]
async fn test_register_rejects_duplicate_email() {
    let (_, _, auth) = build_service();

    auth.register(signup_request("ada@example.com")).await.unwrap();
    let result = auth.register(signup_request("ada@example.com")).await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let (_, _, auth) = build_service();

    let mut req = signup_request("ada@example.com");
    req.password = "short".to_string();

    assert!(matches!(
        auth.register(req).await,
        Err(AppError::BadRequest(_))
    ));
}

#[tokio::test]
async fn test_sign_in_with_correct_password_yields_valid_token() {
    let (_, sessions, auth) = build_service();

    let registered = auth.register(signup_request("ada@example.com")).await.unwrap();
    let (user, token) = auth.sign_in("ada@example.com", "password-one").await.unwrap();

    assert_eq!(user.id, registered.id);

    let claims = sessions.validate(&token).expect("token should validate");
    assert_eq!(claims.id, registered.id.to_string());
    assert_eq!(claims.email, "ada@example.com");
    assert_eq!(claims.role, "USER");
}

#[tokio::test]
async fn test_sign_in_with_wrong_password_fails() {
    let (_, _, auth) = build_service();

    auth.register(signup_request("ada@example.com")).await.unwrap();
    let result = auth.sign_in("ada@example.com", "password-two").await;

    assert!(matches!(result, Err(AppError::InvalidCredentials)));
}

#[tokio::test]
async fn test_sign_in_with_unknown_email_fails() {
    let (_, _, auth) = build_service();

    let result = auth.sign_in("nobody@example.com", "password-one").await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_verify_credentials_does_not_mutate_record() {
    let (users, _, auth) = build_service();

    let user = auth.register(signup_request("ada@example.com")).await.unwrap();
    let before = users.find_by_id(user.id).await.unwrap().unwrap();

    auth.verify_credentials("ada@example.com", "password-one")
        .await
        .unwrap();
    let _ = auth.verify_credentials("ada@example.com", "wrong").await;

    let after = users.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(before.salt, after.salt);
    assert_eq!(before.password_hash, after.password_hash);
    assert_eq!(before.updated_at, after.updated_at);
}

#[tokio::test]
async fn test_change_password_replaces_salt_and_hash() {
    let (users, _, auth) = build_service();

    let user = auth.register(signup_request("ada@example.com")).await.unwrap();
    let before = users.find_by_id(user.id).await.unwrap().unwrap();

    auth.change_password(
        user.id,
        ChangePasswordRequest {
            old_password: "password-one".to_string(),
            new_password: "password-two".to_string(),
        },
    )
    .await
    .unwrap();

    let after = users.find_by_id(user.id).await.unwrap().unwrap();
    assert_ne!(before.salt, after.salt);
    assert_ne!(before.password_hash, after.password_hash);

    // old password no longer verifies, new one does
    assert!(matches!(
        auth.sign_in("ada@example.com", "password-one").await,
        Err(AppError::InvalidCredentials)
    ));
    auth.sign_in("ada@example.com", "password-two").await.unwrap();
}

#[tokio::test]
async fn test_change_password_requires_old_password() {
    let (_, _, auth) = build_service();

    let user = auth.register(signup_request("ada@example.com")).await.unwrap();

    let result = auth
        .change_password(
            user.id,
            ChangePasswordRequest {
                old_password: "wrong".to_string(),
                new_password: "password-two".to_string(),
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::InvalidCredentials)));
}

#[tokio::test]
async fn test_owner_gating_end_to_end() {
    let (_, _, auth) = build_service();

    let a = auth.register(signup_request("a@example.com")).await.unwrap();
    let b = auth.register(signup_request("b@example.com")).await.unwrap();

    // A editing A's post
    assert_eq!(authorize_owner(Some(&a), a.id), Decision::Allow);

    // A editing B's post
    assert_eq!(
        authorize_owner(Some(&a), b.id),
        Decision::Deny(DenyReason::Forbidden)
    );

    // anonymous editing anything
    assert_eq!(
        authorize_owner(None, b.id),
        Decision::Deny(DenyReason::Unauthenticated)
    );
}

#[tokio::test]
async fn test_claims_are_issuance_snapshot() {
    let (users, sessions, auth) = build_service();

    let (user, token) = {
        auth.register(signup_request("ada@example.com")).await.unwrap();
        auth.sign_in("ada@example.com", "password-one").await.unwrap()
    };

    // promote the user after the token was issued
    {
        let mut promoted = user.clone();
        promoted.role = "ADMIN".to_string();
        users.create(&promoted).await.unwrap();
    }

    // the outstanding token still carries the role at issuance time
    let claims = sessions.validate(&token).unwrap();
    assert_eq!(claims.role, "USER");
}
