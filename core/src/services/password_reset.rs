//! Password reset service.
//!
//! Independent OTP lifecycle from registration: operates against an
//! existing user and must not reveal whether an email is registered.

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::domain::entities::password_reset::PasswordResetRequest;
use crate::domain::entities::user::mask_email;
use crate::errors::{AuthError, DomainError, DomainResult, ValidationError};
use crate::repositories::UserRepository;
use crate::services::mailer::Mailer;
use crate::services::registration::{BCRYPT_COST, MIN_PASSWORD_LENGTH};
use crate::services::stores::ResetStore;

/// Password reset service
pub struct PasswordResetService<U, R, M>
where
    U: UserRepository,
    R: ResetStore,
    M: Mailer,
{
    user_repository: Arc<U>,
    reset_store: Arc<R>,
    mailer: Arc<M>,
}

impl<U, R, M> PasswordResetService<U, R, M>
where
    U: UserRepository,
    R: ResetStore,
    M: Mailer,
{
    pub fn new(user_repository: Arc<U>, reset_store: Arc<R>, mailer: Arc<M>) -> Self {
        Self {
            user_repository,
            reset_store,
            mailer,
        }
    }

    /// Issues a reset OTP for a registered email.
    ///
    /// Enumeration-safe: an unknown email is a silent no-op with the same
    /// outward result as a successful issuance. Delivery failures for
    /// known emails are swallowed for the same reason.
    pub async fn request_reset(&self, email: &str) -> DomainResult<()> {
        let email = email.trim().to_lowercase();

        let user = self.user_repository.find_by_email(&email).await?;
        let Some(_user) = user else {
            debug!(
                email = %mask_email(&email),
                event = "reset_noop_unknown_email",
                "Reset requested for unknown email"
            );
            return Ok(());
        };

        let request = PasswordResetRequest::new(email.clone());
        let otp = request.otp.clone();
        self.reset_store.put(request).await?;

        info!(
            email = %mask_email(&email),
            event = "reset_otp_issued",
            "Issued password reset OTP"
        );

        if let Err(e) = self.mailer.send_reset_otp(&email, &otp).await {
            error!(
                email = %mask_email(&email),
                error = %e,
                event = "reset_mail_failed",
                "Failed to send reset OTP"
            );
        }

        Ok(())
    }

    /// Confirms a reset OTP and replaces the user's password.
    ///
    /// Password policy is checked before the store is consulted. Entry
    /// lifecycle matches registration: deleted on success or expiry, kept
    /// on mismatch.
    pub async fn reset(
        &self,
        email: &str,
        otp: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> DomainResult<()> {
        if new_password.len() < MIN_PASSWORD_LENGTH {
            return Err(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LENGTH,
            }
            .into());
        }
        if new_password != confirm_password {
            return Err(ValidationError::PasswordMismatch.into());
        }

        let email = email.trim().to_lowercase();

        let request = match self.reset_store.get(&email).await? {
            Some(r) => r,
            None => return Err(AuthError::ResetRequestNotFound.into()),
        };

        if request.is_expired() {
            self.reset_store.remove(&email).await?;
            return Err(AuthError::OtpExpired.into());
        }

        if !request.otp_matches(otp) {
            warn!(
                email = %mask_email(&email),
                event = "reset_otp_mismatch",
                "Password reset OTP mismatch"
            );
            return Err(AuthError::OtpMismatch.into());
        }

        let user = self
            .user_repository
            .find_by_email(&email)
            .await?
            .ok_or(DomainError::Auth(AuthError::UserNotFound))?;

        let password_hash = bcrypt::hash(new_password, BCRYPT_COST).map_err(|e| {
            DomainError::Internal {
                message: format!("Failed to hash password: {}", e),
            }
        })?;
        self.user_repository
            .update_password(user.id, &password_hash)
            .await?;

        self.reset_store.remove(&email).await?;

        info!(
            email = %mask_email(&email),
            user_id = %user.id,
            event = "password_reset",
            "Password replaced after OTP confirmation"
        );

        if let Err(e) = self.mailer.send_password_changed(&email).await {
            warn!(
                email = %mask_email(&email),
                error = %e,
                "Failed to send password-changed mail"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::user::User;
    use crate::repositories::MockUserRepository;
    use crate::services::mailer::MockMailer;
    use crate::services::stores::MemoryResetStore;
    use chrono::{Duration, Utc};

    async fn service_with_user() -> (
        PasswordResetService<MockUserRepository, MemoryResetStore, MockMailer>,
        Arc<MockUserRepository>,
        Arc<MemoryResetStore>,
        Arc<MockMailer>,
        User,
    ) {
        let users = Arc::new(MockUserRepository::new());
        let store = Arc::new(MemoryResetStore::new());
        let mailer = Arc::new(MockMailer::new());
        let user = User::from_verified_registration(
            "Alice".to_string(),
            "alice@example.com".to_string(),
            bcrypt::hash("old-password", 4).unwrap(),
        );
        users.insert(user.clone()).await;
        let service = PasswordResetService::new(users.clone(), store.clone(), mailer.clone());
        (service, users, store, mailer, user)
    }

    #[tokio::test]
    async fn test_full_reset_flow() {
        let (service, users, store, mailer, user) = service_with_user().await;

        service.request_reset("alice@example.com").await.unwrap();
        let otp = mailer.last_otp().await.expect("reset OTP mailed");

        service
            .reset("alice@example.com", &otp, "new-password-1", "new-password-1")
            .await
            .unwrap();

        let updated = users.find_by_id(user.id).await.unwrap().unwrap();
        assert!(bcrypt::verify("new-password-1", &updated.password_hash).unwrap());
        assert!(store.get("alice@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_enumeration_resistance() {
        let (service, _, store, mailer, _) = service_with_user().await;

        // Known and unknown emails return the identical outward result.
        let known = service.request_reset("alice@example.com").await;
        let unknown = service.request_reset("nobody@example.com").await;
        assert!(known.is_ok());
        assert!(unknown.is_ok());

        // But no entry or mail exists for the unknown one.
        assert!(store.get("nobody@example.com").await.unwrap().is_none());
        let sent = mailer.sent().await;
        assert!(sent.iter().all(|m| m.email != "nobody@example.com"));
    }

    #[tokio::test]
    async fn test_validation_precedes_store_lookup() {
        let (service, _, _, _, _) = service_with_user().await;

        // No reset was ever requested; a short password must still fail on
        // validation, not on the missing entry.
        let result = service
            .reset("alice@example.com", "123456", "short", "short")
            .await;
        assert!(matches!(
            result,
            Err(DomainError::ValidationErr(ValidationError::PasswordTooShort { .. }))
        ));

        let result = service
            .reset("alice@example.com", "123456", "long-enough-1", "long-enough-2")
            .await;
        assert!(matches!(
            result,
            Err(DomainError::ValidationErr(ValidationError::PasswordMismatch))
        ));
    }

    #[tokio::test]
    async fn test_expired_reset_entry_removed() {
        let (service, _, store, mailer, _) = service_with_user().await;
        service.request_reset("alice@example.com").await.unwrap();

        let mut request = store.get("alice@example.com").await.unwrap().unwrap();
        request.expires_at = Utc::now() - Duration::seconds(1);
        store.put(request).await.unwrap();

        let otp = mailer.last_otp().await.unwrap();
        let result = service
            .reset("alice@example.com", &otp, "new-password-1", "new-password-1")
            .await;
        assert!(matches!(
            result,
            Err(DomainError::Auth(AuthError::OtpExpired))
        ));
        assert!(store.get("alice@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_wrong_otp_keeps_entry() {
        let (service, _, store, _, _) = service_with_user().await;
        service.request_reset("alice@example.com").await.unwrap();

        let result = service
            .reset("alice@example.com", "000000", "new-password-1", "new-password-1")
            .await;
        assert!(matches!(
            result,
            Err(DomainError::Auth(AuthError::OtpMismatch))
        ));
        assert!(store.get("alice@example.com").await.unwrap().is_some());
    }
}
