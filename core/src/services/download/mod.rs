//! Download authorization engine: quota tracking, token mint/redeem and
//! the background token sweep.

pub mod config;
pub mod files;
pub mod quota;
pub mod service;
pub mod sweeper;


pub use config::{DownloadConfig, QuotaWindow};
pub use files::{FileStore, MockFileStore, ResolvedFile};
pub use quota::{QuotaStatus, QuotaTracker};
pub use service::{DownloadService, MintedLink, RedeemedFile};
pub use sweeper::TokenSweeper;
