//! Session authentication: credential check and JWT session tokens.
//!
//! The session token is carried in an `auth_token` cookie by the HTTP
//! layer; this module only mints and verifies it.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::entities::user::{mask_email, User, UserRole};
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::UserRepository;

/// JWT configuration for session tokens
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC signing secret
    pub secret: String,
    /// Session lifetime in hours
    pub expiration_hours: i64,
}

impl JwtConfig {
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            expiration_hours: 1,
        }
    }
}

/// Claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
    /// Token id
    pub jti: String,
}

impl Claims {
    pub fn user_id(&self) -> DomainResult<Uuid> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| DomainError::Auth(AuthError::InvalidSessionToken))
    }
}

/// Authentication service: password login and session token handling
pub struct AuthService<U: UserRepository> {
    user_repository: Arc<U>,
    config: JwtConfig,
}

impl<U: UserRepository> AuthService<U> {
    pub fn new(user_repository: Arc<U>, config: JwtConfig) -> Self {
        Self {
            user_repository,
            config,
        }
    }

    /// Verifies credentials and mints a session token.
    ///
    /// Unverified accounts cannot log in, matching the registration flow:
    /// a user only exists after OTP verification, but imported accounts
    /// may carry `is_verified = false`.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<(User, String)> {
        let email = email.trim().to_lowercase();

        let user = self
            .user_repository
            .find_by_email(&email)
            .await?
            .ok_or(DomainError::Auth(AuthError::UserNotFound))?;

        if !user.is_verified {
            return Err(AuthError::AccountNotVerified.into());
        }

        let matches = bcrypt::verify(password, &user.password_hash).map_err(|e| {
            DomainError::Internal {
                message: format!("Password verification failed: {}", e),
            }
        })?;
        if !matches {
            warn!(
                email = %mask_email(&email),
                event = "login_failed",
                "Incorrect password"
            );
            return Err(AuthError::InvalidCredentials.into());
        }

        let token = self.issue_session(&user)?;

        info!(
            email = %mask_email(&email),
            user_id = %user.id,
            event = "login_success",
            "User logged in"
        );

        Ok((user, token))
    }

    /// Mints a session token for an authenticated user.
    pub fn issue_session(&self, user: &User) -> DomainResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.config.expiration_hours)).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.secret.as_bytes()),
        )
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to sign session token: {}", e),
        })
    }

    /// Verifies a session token and returns its claims.
    pub fn verify_session(&self, token: &str) -> DomainResult<Claims> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                DomainError::Auth(AuthError::SessionExpired)
            }
            _ => DomainError::Auth(AuthError::InvalidSessionToken),
        })
    }
}
