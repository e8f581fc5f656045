//! MySQL implementation of the DownloadRepository trait: the append-only
//! download ledger.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use std::str::FromStr;
use uuid::Uuid;

use vault_core::domain::entities::download_record::DownloadRecord;
use vault_core::domain::entities::post::FileKind;
use vault_core::errors::{DomainError, DomainResult};
use vault_core::repositories::DownloadRepository;

pub struct MySqlDownloadRepository {
    pool: MySqlPool,
}

impl MySqlDownloadRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_record(row: &sqlx::mysql::MySqlRow) -> DomainResult<DownloadRecord> {
        let id: String = row.try_get("id").map_err(|e| DomainError::Internal {
            message: format!("Failed to get id: {}", e),
        })?;
        let user_id: String = row.try_get("user_id").map_err(|e| DomainError::Internal {
            message: format!("Failed to get user_id: {}", e),
        })?;
        let post_id: String = row.try_get("post_id").map_err(|e| DomainError::Internal {
            message: format!("Failed to get post_id: {}", e),
        })?;
        let kind: String = row.try_get("file_kind").map_err(|e| DomainError::Internal {
            message: format!("Failed to get file_kind: {}", e),
        })?;

        Ok(DownloadRecord {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid UUID: {}", e),
            })?,
            user_id: Uuid::parse_str(&user_id).map_err(|e| DomainError::Internal {
                message: format!("Invalid UUID: {}", e),
            })?,
            post_id: Uuid::parse_str(&post_id).map_err(|e| DomainError::Internal {
                message: format!("Invalid UUID: {}", e),
            })?,
            kind: FileKind::from_str(&kind).map_err(|e| DomainError::Internal {
                message: format!("Invalid file kind in ledger: {}", e),
            })?,
            file_name: row
                .try_get("file_name")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get file_name: {}", e),
                })?,
            ip_address: row
                .try_get("ip_address")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get ip_address: {}", e),
                })?,
            user_agent: row
                .try_get("user_agent")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get user_agent: {}", e),
                })?,
            downloaded_at: row
                .try_get::<DateTime<Utc>, _>("downloaded_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get downloaded_at: {}", e),
                })?,
        })
    }
}

#[async_trait]
impl DownloadRepository for MySqlDownloadRepository {
    async fn count_since(&self, user_id: Uuid, since: DateTime<Utc>) -> DomainResult<u32> {
        let query = r#"
            SELECT COUNT(*) AS cnt
            FROM downloads
            WHERE user_id = ? AND downloaded_at >= ?
        "#;

        let row = sqlx::query(query)
            .bind(user_id.to_string())
            .bind(since)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Database query failed: {}", e),
            })?;

        let count: i64 = row.try_get("cnt").map_err(|e| DomainError::Internal {
            message: format!("Failed to get count: {}", e),
        })?;
        Ok(count as u32)
    }

    async fn append(&self, record: DownloadRecord) -> DomainResult<DownloadRecord> {
        let query = r#"
            INSERT INTO downloads
                (id, user_id, post_id, file_kind, file_name, ip_address, user_agent, downloaded_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(record.id.to_string())
            .bind(record.user_id.to_string())
            .bind(record.post_id.to_string())
            .bind(record.kind.as_str())
            .bind(&record.file_name)
            .bind(&record.ip_address)
            .bind(&record.user_agent)
            .bind(record.downloaded_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to append download record: {}", e),
            })?;

        Ok(record)
    }

    async fn recent_for_user(&self, user_id: Uuid, limit: u32) -> DomainResult<Vec<DownloadRecord>> {
        let query = r#"
            SELECT id, user_id, post_id, file_kind, file_name,
                   ip_address, user_agent, downloaded_at
            FROM downloads
            WHERE user_id = ?
            ORDER BY downloaded_at DESC
            LIMIT ?
        "#;

        let rows = sqlx::query(query)
            .bind(user_id.to_string())
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Database query failed: {}", e),
            })?;

        rows.iter().map(Self::row_to_record).collect()
    }
}
