//! Password reset request entity. Same lifecycle class as
//! `PendingRegistration` but mutates an existing user instead of
//! materializing a new one.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::pending_registration::{generate_otp, OTP_EXPIRATION_MINUTES};

/// A password reset awaiting OTP confirmation, keyed by email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordResetRequest {
    /// Email address the OTP was sent to (store key)
    pub email: String,

    /// The 6-digit one-time code
    pub otp: String,

    /// Timestamp when the reset was requested
    pub created_at: DateTime<Utc>,

    /// Timestamp when the OTP expires
    pub expires_at: DateTime<Utc>,
}

impl PasswordResetRequest {
    pub fn new(email: String) -> Self {
        let now = Utc::now();
        Self {
            email,
            otp: generate_otp(),
            created_at: now,
            expires_at: now + Duration::minutes(OTP_EXPIRATION_MINUTES),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    pub fn otp_matches(&self, supplied: &str) -> bool {
        supplied.len() == self.otp.len()
            && constant_time_eq::constant_time_eq(supplied.as_bytes(), self.otp.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_reset_request() {
        let request = PasswordResetRequest::new("alice@example.com".to_string());
        assert!(!request.is_expired());
        assert_eq!(request.otp.len(), 6);
    }

    #[test]
    fn test_otp_matches() {
        let request = PasswordResetRequest::new("alice@example.com".to_string());
        let otp = request.otp.clone();
        assert!(request.otp_matches(&otp));
        assert!(!request.otp_matches("000000"));
    }

    #[test]
    fn test_expired_request() {
        let mut request = PasswordResetRequest::new("alice@example.com".to_string());
        request.expires_at = Utc::now() - Duration::seconds(1);
        assert!(request.is_expired());
    }
}
