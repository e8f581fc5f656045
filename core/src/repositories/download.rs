//! Download record repository interface and mock implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::download_record::DownloadRecord;
use crate::errors::{DomainError, DomainResult};

/// Persistence interface for the append-only download ledger.
#[async_trait]
pub trait DownloadRepository: Send + Sync {
    /// Counts records for `user_id` with `downloaded_at >= since`.
    async fn count_since(&self, user_id: Uuid, since: DateTime<Utc>) -> DomainResult<u32>;

    /// Appends one record to the ledger.
    async fn append(&self, record: DownloadRecord) -> DomainResult<DownloadRecord>;

    /// Most recent records for a user, newest first.
    async fn recent_for_user(&self, user_id: Uuid, limit: u32) -> DomainResult<Vec<DownloadRecord>>;
}

/// In-memory download ledger for tests.
///
/// `fail_reads` makes every read return a storage error, which lets tests
/// exercise the fail-open quota policy.
#[doc(hidden)]
pub struct MockDownloadRepository {
    records: Arc<RwLock<Vec<DownloadRecord>>>,
    fail_reads: AtomicBool,
}

impl MockDownloadRepository {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
            fail_reads: AtomicBool::new(false),
        }
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Seeds a record with an explicit timestamp.
    pub async fn insert_at(&self, mut record: DownloadRecord, at: DateTime<Utc>) {
        record.downloaded_at = at;
        self.records.write().await.push(record);
    }
}

impl Default for MockDownloadRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DownloadRepository for MockDownloadRepository {
    async fn count_since(&self, user_id: Uuid, since: DateTime<Utc>) -> DomainResult<u32> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(DomainError::Internal {
                message: "simulated ledger read failure".to_string(),
            });
        }
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.user_id == user_id && r.downloaded_at >= since)
            .count() as u32)
    }

    async fn append(&self, record: DownloadRecord) -> DomainResult<DownloadRecord> {
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn recent_for_user(&self, user_id: Uuid, limit: u32) -> DomainResult<Vec<DownloadRecord>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(DomainError::Internal {
                message: "simulated ledger read failure".to_string(),
            });
        }
        let records = self.records.read().await;
        let mut mine: Vec<DownloadRecord> = records
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.downloaded_at.cmp(&a.downloaded_at));
        mine.truncate(limit as usize);
        Ok(mine)
    }
}
