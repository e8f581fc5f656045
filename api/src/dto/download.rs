//! Download request/response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vault_core::services::{MintedLink, QuotaStatus};
use vault_core::{DownloadRecord, FileKind};

/// Response for a freshly minted download link
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateLinkResponse {
    pub success: bool,

    #[serde(rename = "downloadURL")]
    pub download_url: String,

    #[serde(rename = "fileType")]
    pub file_type: FileKind,

    #[serde(rename = "expiresAt")]
    pub expires_at: DateTime<Utc>,

    #[serde(rename = "downloadStatus")]
    pub download_status: QuotaStatus,
}

impl GenerateLinkResponse {
    pub fn from_minted(minted: &MintedLink, kind: FileKind) -> Self {
        Self {
            success: true,
            download_url: format!("/download-temp/{}", minted.token),
            file_type: kind,
            expires_at: minted.expires_at,
            download_status: minted.status,
        }
    }
}

/// Response for the quota standing endpoint
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckLimitResponse {
    pub count: u32,
    pub remaining: u32,
    pub limit_reached: bool,
    pub limit: u32,
}

/// One entry in the caller's download history
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub post_id: String,
    pub file_type: FileKind,
    pub file_name: String,
    pub downloaded_at: DateTime<Utc>,
}

impl From<&DownloadRecord> for HistoryEntry {
    fn from(record: &DownloadRecord) -> Self {
        Self {
            post_id: record.post_id.to_string(),
            file_type: record.kind,
            file_name: record.file_name.clone(),
            downloaded_at: record.downloaded_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub downloads: Vec<HistoryEntry>,
}
