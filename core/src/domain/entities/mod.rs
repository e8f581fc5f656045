//! Domain entities.

pub mod download_record;
pub mod download_token;
pub mod password_reset;
pub mod pending_registration;
pub mod post;
pub mod user;

pub use download_record::DownloadRecord;
pub use download_token::DownloadToken;
pub use password_reset::PasswordResetRequest;
pub use pending_registration::PendingRegistration;
pub use post::{FileKind, Post, PostStatus};
pub use user::{User, UserRole};
