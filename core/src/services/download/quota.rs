//! Daily download quota tracking over the append-only ledger.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

use crate::domain::entities::download_record::DownloadRecord;
use crate::domain::entities::post::FileKind;
use crate::errors::DomainResult;
use crate::repositories::DownloadRepository;

use super::config::DownloadConfig;

/// Snapshot of a user's quota standing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaStatus {
    /// Completed downloads inside the current window
    pub count: u32,
    /// Downloads left before the cap
    pub remaining: u32,
    /// Whether the cap has been reached
    pub limit_reached: bool,
}

impl QuotaStatus {
    fn from_count(count: u32, limit: u32) -> Self {
        Self {
            count,
            remaining: limit.saturating_sub(count),
            limit_reached: count >= limit,
        }
    }

    /// The permissive default used when the ledger cannot be read.
    fn open(limit: u32) -> Self {
        Self {
            count: 0,
            remaining: limit,
            limit_reached: false,
        }
    }
}

/// Quota tracker over the download ledger
pub struct QuotaTracker<D: DownloadRepository> {
    repository: Arc<D>,
    config: DownloadConfig,
}

impl<D: DownloadRepository> QuotaTracker<D> {
    pub fn new(repository: Arc<D>, config: DownloadConfig) -> Self {
        Self { repository, config }
    }

    pub fn limit(&self) -> u32 {
        self.config.daily_limit
    }

    /// Counts completed downloads for `user_id` in the current window.
    ///
    /// Never fails when `fail_open` is set: a ledger read error degrades
    /// to "no downloads yet" and the error is only logged. With
    /// `fail_open` off the error propagates and the caller rejects.
    pub async fn check_daily_limit(&self, user_id: Uuid) -> DomainResult<QuotaStatus> {
        let since = self.config.quota_window.start(Utc::now());

        match self.repository.count_since(user_id, since).await {
            Ok(count) => Ok(QuotaStatus::from_count(count, self.config.daily_limit)),
            Err(e) if self.config.fail_open => {
                error!(
                    user_id = %user_id,
                    error = %e,
                    event = "quota_check_failed_open",
                    "Ledger read failed; quota check degrading to open"
                );
                Ok(QuotaStatus::open(self.config.daily_limit))
            }
            Err(e) => Err(e),
        }
    }

    /// Appends one ledger entry for a completed transfer.
    pub async fn record(
        &self,
        user_id: Uuid,
        post_id: Uuid,
        kind: FileKind,
        file_name: String,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> DomainResult<DownloadRecord> {
        let record =
            DownloadRecord::new(user_id, post_id, kind, file_name, ip_address, user_agent);
        self.repository.append(record).await
    }

    /// Most recent ledger entries for a user.
    pub async fn history(&self, user_id: Uuid, limit: u32) -> DomainResult<Vec<DownloadRecord>> {
        self.repository.recent_for_user(user_id, limit).await
    }
}
