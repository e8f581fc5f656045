//! Download token entity: a short-lived, single-use credential authorizing
//! one file transfer to one identity.

use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::post::FileKind;

/// Number of random bytes in a token value (hex-encoded to 64 chars)
pub const TOKEN_BYTES: usize = 32;

/// How long a minted download link stays redeemable
pub const TOKEN_EXPIRATION_MINUTES: i64 = 60;

/// An ephemeral download authorization, keyed by its opaque token value.
/// Redeemable at most once, and only by the identity it was minted for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadToken {
    /// Opaque random token value (64 hex chars, 256 bits of entropy)
    pub token: String,

    /// Identity the token was minted for
    pub user_id: Uuid,

    /// Post the token authorizes a download from
    pub post_id: Uuid,

    /// Which attachment of the post may be downloaded
    pub kind: FileKind,

    /// Timestamp when the token was minted
    pub created_at: DateTime<Utc>,

    /// Timestamp when the token expires
    pub expires_at: DateTime<Utc>,
}

impl DownloadToken {
    /// Mints a token bound to `(user, post, kind)` with the default expiry.
    pub fn mint(user_id: Uuid, post_id: Uuid, kind: FileKind) -> Self {
        let now = Utc::now();
        Self {
            token: generate_token_value(),
            user_id,
            post_id,
            kind,
            created_at: now,
            expires_at: now + Duration::minutes(TOKEN_EXPIRATION_MINUTES),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Whether `caller` is the identity this token was minted for.
    pub fn is_owned_by(&self, caller: Uuid) -> bool {
        self.user_id == caller
    }
}

/// Generates an unguessable token value from the OS CSPRNG.
pub fn generate_token_value() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_value_format() {
        let value = generate_token_value();
        assert_eq!(value.len(), TOKEN_BYTES * 2);
        assert!(value.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_token_values_unique() {
        let a = generate_token_value();
        let b = generate_token_value();
        assert_ne!(a, b);
    }

    #[test]
    fn test_mint_binds_identity() {
        let user = Uuid::new_v4();
        let post = Uuid::new_v4();
        let token = DownloadToken::mint(user, post, FileKind::Pdf);

        assert!(token.is_owned_by(user));
        assert!(!token.is_owned_by(Uuid::new_v4()));
        assert!(!token.is_expired());
        assert_eq!(
            token.expires_at,
            token.created_at + Duration::minutes(TOKEN_EXPIRATION_MINUTES)
        );
    }

    #[test]
    fn test_expired_token() {
        let mut token = DownloadToken::mint(Uuid::new_v4(), Uuid::new_v4(), FileKind::Zip);
        token.expires_at = Utc::now() - Duration::seconds(1);
        assert!(token.is_expired());
    }
}
