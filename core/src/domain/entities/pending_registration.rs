//! Pending registration entity for email OTP verification.

use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, Rng};
use serde::{Deserialize, Serialize};

/// Length of the one-time code
pub const OTP_LENGTH: usize = 6;

/// How long an OTP stays valid, shared by registration and password
/// reset.
pub const OTP_EXPIRATION_MINUTES: i64 = 10;

/// A registration awaiting email verification. Lives only in the ephemeral
/// pending store, keyed by email; it materializes into a `User` on
/// successful OTP verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRegistration {
    /// Display name supplied at registration
    pub name: String,

    /// Email address the OTP was sent to (store key)
    pub email: String,

    /// Bcrypt hash of the supplied password
    pub password_hash: String,

    /// The 6-digit one-time code
    pub otp: String,

    /// Timestamp when the registration was requested
    pub created_at: DateTime<Utc>,

    /// Timestamp when the OTP expires
    pub expires_at: DateTime<Utc>,
}

impl PendingRegistration {
    /// Creates a pending registration with a fresh OTP and the default
    /// expiration window.
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            name,
            email,
            password_hash,
            otp: generate_otp(),
            created_at: now,
            expires_at: now + Duration::minutes(OTP_EXPIRATION_MINUTES),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Compares the supplied code against the stored one in constant time.
    pub fn otp_matches(&self, supplied: &str) -> bool {
        supplied.len() == self.otp.len()
            && constant_time_eq::constant_time_eq(supplied.as_bytes(), self.otp.as_bytes())
    }
}

/// Generates a 6-digit one-time code drawn uniformly from
/// [100000, 999999] using the OS CSPRNG.
pub fn generate_otp() -> String {
    let mut rng = OsRng;
    let code: u32 = rng.gen_range(100_000..=999_999);
    format!("{}", code)
}
