//! Registration service: email OTP issuance and verification.
//!
//! A registration request parks a [`PendingRegistration`] in the ephemeral
//! store and mails the OTP; verifying the OTP materializes a verified
//! `User`. Nothing touches the user collection until verification
//! succeeds.

use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::domain::entities::pending_registration::PendingRegistration;
use crate::domain::entities::user::{mask_email, User};
use crate::errors::{AuthError, DomainError, DomainResult, ValidationError};
use crate::repositories::UserRepository;
use crate::services::mailer::Mailer;
use crate::services::stores::PendingStore;

/// Minimum accepted password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Bcrypt work factor for password hashes
pub const BCRYPT_COST: u32 = 10;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Validates an email address format.
pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 254 && EMAIL_RE.is_match(email)
}

/// Registration service
pub struct RegistrationService<U, P, M>
where
    U: UserRepository,
    P: PendingStore,
    M: Mailer,
{
    user_repository: Arc<U>,
    pending_store: Arc<P>,
    mailer: Arc<M>,
}

impl<U, P, M> RegistrationService<U, P, M>
where
    U: UserRepository,
    P: PendingStore,
    M: Mailer,
{
    pub fn new(user_repository: Arc<U>, pending_store: Arc<P>, mailer: Arc<M>) -> Self {
        Self {
            user_repository,
            pending_store,
            mailer,
        }
    }

    /// Starts a registration: validates input, parks a pending entry and
    /// mails the OTP.
    ///
    /// Re-registering the same email before verification overwrites the
    /// prior pending entry; only the newest OTP is valid.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> DomainResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::RequiredField {
                field: "name".to_string(),
            }
            .into());
        }

        let email = email.trim().to_lowercase();
        if !is_valid_email(&email) {
            return Err(ValidationError::InvalidEmail.into());
        }

        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LENGTH,
            }
            .into());
        }

        if self.user_repository.exists_by_email(&email).await? {
            return Err(AuthError::EmailAlreadyRegistered.into());
        }

        let password_hash = bcrypt::hash(password, BCRYPT_COST).map_err(|e| {
            DomainError::Internal {
                message: format!("Failed to hash password: {}", e),
            }
        })?;

        let pending =
            PendingRegistration::new(name.to_string(), email.clone(), password_hash);
        let otp = pending.otp.clone();

        // Last write wins: any earlier pending entry for this email is gone.
        self.pending_store.put(pending).await?;

        info!(
            email = %mask_email(&email),
            event = "registration_otp_issued",
            "Issued registration OTP"
        );

        // OTP delivery failure is fatal for the request: the caller can
        // never learn the code otherwise.
        self.mailer
            .send_registration_otp(&email, name, &otp)
            .await
            .map_err(|e| {
                error!(
                    email = %mask_email(&email),
                    error = %e,
                    event = "otp_mail_failed",
                    "Failed to send registration OTP"
                );
                DomainError::Internal {
                    message: "Failed to send OTP".to_string(),
                }
            })?;

        Ok(())
    }

    /// Verifies a registration OTP.
    ///
    /// One-shot semantics: on success or expiry the pending entry is
    /// deleted; on a mismatch it survives for retry until it expires.
    pub async fn verify(&self, email: &str, otp: &str) -> DomainResult<User> {
        let email = email.trim().to_lowercase();

        let pending = match self.pending_store.get(&email).await? {
            Some(p) => p,
            None => {
                return Err(AuthError::PendingRegistrationNotFound.into());
            }
        };

        if pending.is_expired() {
            self.pending_store.remove(&email).await?;
            warn!(
                email = %mask_email(&email),
                event = "registration_otp_expired",
                "Registration OTP expired"
            );
            return Err(AuthError::OtpExpired.into());
        }

        if !pending.otp_matches(otp) {
            warn!(
                email = %mask_email(&email),
                event = "registration_otp_mismatch",
                "Registration OTP mismatch"
            );
            return Err(AuthError::OtpMismatch.into());
        }

        let user = User::from_verified_registration(
            pending.name.clone(),
            pending.email.clone(),
            pending.password_hash.clone(),
        );
        let user = self.user_repository.create(user).await?;

        self.pending_store.remove(&email).await?;

        info!(
            email = %mask_email(&email),
            user_id = %user.id,
            event = "user_verified",
            "User verified and created"
        );

        // Welcome mail is best effort; a delivery failure never fails the
        // verification.
        if let Err(e) = self.mailer.send_welcome(&email, &user.name).await {
            warn!(
                email = %mask_email(&email),
                error = %e,
                "Failed to send welcome mail"
            );
        }

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MockUserRepository;
    use crate::services::mailer::MockMailer;
    use crate::services::stores::MemoryPendingStore;
    use chrono::{Duration, Utc};

    fn service() -> (
        RegistrationService<MockUserRepository, MemoryPendingStore, MockMailer>,
        Arc<MockUserRepository>,
        Arc<MemoryPendingStore>,
        Arc<MockMailer>,
    ) {
        let users = Arc::new(MockUserRepository::new());
        let store = Arc::new(MemoryPendingStore::new());
        let mailer = Arc::new(MockMailer::new());
        let service =
            RegistrationService::new(users.clone(), store.clone(), mailer.clone());
        (service, users, store, mailer)
    }

    #[tokio::test]
    async fn test_register_then_verify() {
        let (service, users, _, mailer) = service();

        service
            .register("Alice", "alice@example.com", "hunter2-hunter2")
            .await
            .unwrap();

        let otp = mailer.last_otp().await.expect("OTP mailed");
        let user = service.verify("alice@example.com", &otp).await.unwrap();

        assert!(user.is_verified);
        assert_eq!(user.email, "alice@example.com");
        assert!(users
            .find_by_email("alice@example.com")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_verify_is_one_shot() {
        let (service, _, _, mailer) = service();
        service
            .register("Alice", "alice@example.com", "hunter2-hunter2")
            .await
            .unwrap();
        let otp = mailer.last_otp().await.unwrap();

        assert!(service.verify("alice@example.com", &otp).await.is_ok());

        // The pending entry is gone; replaying the same OTP finds nothing.
        let second = service.verify("alice@example.com", &otp).await;
        assert!(matches!(
            second,
            Err(DomainError::Auth(AuthError::PendingRegistrationNotFound))
        ));
    }

    #[tokio::test]
    async fn test_mismatch_keeps_entry_alive() {
        let (service, _, store, mailer) = service();
        service
            .register("Alice", "alice@example.com", "hunter2-hunter2")
            .await
            .unwrap();

        let wrong = service.verify("alice@example.com", "000000").await;
        assert!(matches!(
            wrong,
            Err(DomainError::Auth(AuthError::OtpMismatch))
        ));
        assert!(store.get("alice@example.com").await.unwrap().is_some());

        // Correct code still works after a failed attempt.
        let otp = mailer.last_otp().await.unwrap();
        assert!(service.verify("alice@example.com", &otp).await.is_ok());
    }

    #[tokio::test]
    async fn test_expired_otp_deletes_entry() {
        let (service, _, store, mailer) = service();
        service
            .register("Alice", "alice@example.com", "hunter2-hunter2")
            .await
            .unwrap();

        // Force expiry
        let mut pending = store.get("alice@example.com").await.unwrap().unwrap();
        pending.expires_at = Utc::now() - Duration::seconds(1);
        store.put(pending).await.unwrap();

        let otp = mailer.last_otp().await.unwrap();
        let result = service.verify("alice@example.com", &otp).await;
        assert!(matches!(
            result,
            Err(DomainError::Auth(AuthError::OtpExpired))
        ));
        assert!(store.get("alice@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reissue_overwrites_previous_otp() {
        let (service, _, _, mailer) = service();
        service
            .register("Alice", "alice@example.com", "hunter2-hunter2")
            .await
            .unwrap();
        let first_otp = mailer.last_otp().await.unwrap();

        service
            .register("Alice", "alice@example.com", "hunter2-hunter2")
            .await
            .unwrap();
        let second_otp = mailer.last_otp().await.unwrap();

        if first_otp != second_otp {
            let stale = service.verify("alice@example.com", &first_otp).await;
            assert!(matches!(
                stale,
                Err(DomainError::Auth(AuthError::OtpMismatch))
            ));
        }
        assert!(service.verify("alice@example.com", &second_otp).await.is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let (service, users, _, _) = service();
        users
            .insert(User::from_verified_registration(
                "Bob".to_string(),
                "bob@example.com".to_string(),
                "hash".to_string(),
            ))
            .await;

        let result = service.register("Bob", "bob@example.com", "hunter2-hunter2").await;
        assert!(matches!(
            result,
            Err(DomainError::Auth(AuthError::EmailAlreadyRegistered))
        ));
    }

    #[tokio::test]
    async fn test_input_validation() {
        let (service, _, _, _) = service();

        assert!(matches!(
            service.register("", "alice@example.com", "hunter2-hunter2").await,
            Err(DomainError::ValidationErr(ValidationError::RequiredField { .. }))
        ));
        assert!(matches!(
            service.register("Alice", "not-an-email", "hunter2-hunter2").await,
            Err(DomainError::ValidationErr(ValidationError::InvalidEmail))
        ));
        assert!(matches!(
            service.register("Alice", "alice@example.com", "short").await,
            Err(DomainError::ValidationErr(ValidationError::PasswordTooShort { .. }))
        ));
    }
}
