//! Download record entity: the append-only ledger of completed transfers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::post::FileKind;

/// One completed file transfer. Appended exactly once per successful
/// redemption; never mutated or deleted by this subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub kind: FileKind,

    /// Basename of the file that was streamed
    pub file_name: String,

    /// Client IP address, if known
    pub ip_address: Option<String>,

    /// Client user agent, if known
    pub user_agent: Option<String>,

    pub downloaded_at: DateTime<Utc>,
}

impl DownloadRecord {
    pub fn new(
        user_id: Uuid,
        post_id: Uuid,
        kind: FileKind,
        file_name: String,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            post_id,
            kind,
            file_name,
            ip_address,
            user_agent,
            downloaded_at: Utc::now(),
        }
    }
}
