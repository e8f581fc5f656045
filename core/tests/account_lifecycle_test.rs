//! Cross-service integration tests: registration, login and password
//! reset against the in-memory implementations.

use std::sync::Arc;

use vault_core::errors::{AuthError, DomainError};
use vault_core::repositories::MockUserRepository;
use vault_core::services::mailer::MockMailer;
use vault_core::services::{
    AuthService, JwtConfig, MemoryPendingStore, MemoryResetStore, PasswordResetService,
    RegistrationService,
};

struct Stack {
    registration: RegistrationService<MockUserRepository, MemoryPendingStore, MockMailer>,
    auth: AuthService<MockUserRepository>,
    password_reset: PasswordResetService<MockUserRepository, MemoryResetStore, MockMailer>,
    mailer: Arc<MockMailer>,
}

fn stack() -> Stack {
    let users = Arc::new(MockUserRepository::new());
    let mailer = Arc::new(MockMailer::new());
    Stack {
        registration: RegistrationService::new(
            users.clone(),
            Arc::new(MemoryPendingStore::new()),
            mailer.clone(),
        ),
        auth: AuthService::new(users.clone(), JwtConfig::new("test-secret".to_string())),
        password_reset: PasswordResetService::new(
            users,
            Arc::new(MemoryResetStore::new()),
            mailer.clone(),
        ),
        mailer,
    }
}

#[tokio::test]
async fn registered_user_can_log_in() {
    let s = stack();

    s.registration
        .register("Alice", "alice@example.com", "password-123")
        .await
        .unwrap();

    // Not logged in before verification: the account does not exist yet.
    let early = s.auth.login("alice@example.com", "password-123").await;
    assert!(matches!(
        early,
        Err(DomainError::Auth(AuthError::UserNotFound))
    ));

    let otp = s.mailer.last_otp().await.unwrap();
    s.registration.verify("alice@example.com", &otp).await.unwrap();

    let (user, token) = s
        .auth
        .login("alice@example.com", "password-123")
        .await
        .unwrap();
    let claims = s.auth.verify_session(&token).unwrap();
    assert_eq!(claims.user_id().unwrap(), user.id);
}

#[tokio::test]
async fn reset_replaces_the_login_password() {
    let s = stack();

    s.registration
        .register("Alice", "alice@example.com", "old-password-1")
        .await
        .unwrap();
    let otp = s.mailer.last_otp().await.unwrap();
    s.registration.verify("alice@example.com", &otp).await.unwrap();

    s.password_reset
        .request_reset("alice@example.com")
        .await
        .unwrap();
    let reset_otp = s.mailer.last_otp().await.unwrap();
    s.password_reset
        .reset(
            "alice@example.com",
            &reset_otp,
            "new-password-1",
            "new-password-1",
        )
        .await
        .unwrap();

    let stale = s.auth.login("alice@example.com", "old-password-1").await;
    assert!(matches!(
        stale,
        Err(DomainError::Auth(AuthError::InvalidCredentials))
    ));
    assert!(s
        .auth
        .login("alice@example.com", "new-password-1")
        .await
        .is_ok());
}

#[tokio::test]
async fn reset_otp_is_single_use() {
    let s = stack();

    s.registration
        .register("Alice", "alice@example.com", "old-password-1")
        .await
        .unwrap();
    let otp = s.mailer.last_otp().await.unwrap();
    s.registration.verify("alice@example.com", &otp).await.unwrap();

    s.password_reset
        .request_reset("alice@example.com")
        .await
        .unwrap();
    let reset_otp = s.mailer.last_otp().await.unwrap();
    s.password_reset
        .reset(
            "alice@example.com",
            &reset_otp,
            "new-password-1",
            "new-password-1",
        )
        .await
        .unwrap();

    let replay = s
        .password_reset
        .reset(
            "alice@example.com",
            &reset_otp,
            "other-password-1",
            "other-password-1",
        )
        .await;
    assert!(matches!(
        replay,
        Err(DomainError::Auth(AuthError::ResetRequestNotFound))
    ));
}
