//! Business services.

pub mod auth;
pub mod download;
pub mod mailer;
pub mod password_reset;
pub mod registration;
pub mod stores;

pub use auth::{AuthService, Claims, JwtConfig};
pub use download::{
    DownloadConfig, DownloadService, FileStore, MintedLink, QuotaStatus, QuotaTracker,
    QuotaWindow, RedeemedFile, ResolvedFile, TokenSweeper,
};
pub use mailer::Mailer;
pub use password_reset::PasswordResetService;
pub use registration::RegistrationService;
pub use stores::{
    MemoryPendingStore, MemoryResetStore, MemoryTokenStore, PendingStore, ResetStore, TokenStore,
};
