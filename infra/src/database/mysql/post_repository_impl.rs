//! MySQL implementation of the PostRepository trait. Lookup only: posts
//! are written by the content subsystem.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use vault_core::domain::entities::post::{Post, PostStatus};
use vault_core::errors::{DomainError, DomainResult};
use vault_core::repositories::PostRepository;

pub struct MySqlPostRepository {
    pool: MySqlPool,
}

impl MySqlPostRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_post(row: &sqlx::mysql::MySqlRow) -> DomainResult<Post> {
        let id: String = row.try_get("id").map_err(|e| DomainError::Internal {
            message: format!("Failed to get id: {}", e),
        })?;
        let status: String = row.try_get("status").map_err(|e| DomainError::Internal {
            message: format!("Failed to get status: {}", e),
        })?;

        let status = match status.as_str() {
            "published" => PostStatus::Published,
            "archived" => PostStatus::Archived,
            _ => PostStatus::Draft,
        };

        Ok(Post {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid UUID: {}", e),
            })?,
            title: row.try_get("title").map_err(|e| DomainError::Internal {
                message: format!("Failed to get title: {}", e),
            })?,
            slug: row.try_get("slug").map_err(|e| DomainError::Internal {
                message: format!("Failed to get slug: {}", e),
            })?,
            status,
            pdf_path: row.try_get("pdf_path").map_err(|e| DomainError::Internal {
                message: format!("Failed to get pdf_path: {}", e),
            })?,
            zip_path: row.try_get("zip_path").map_err(|e| DomainError::Internal {
                message: format!("Failed to get zip_path: {}", e),
            })?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get created_at: {}", e),
                })?,
        })
    }
}

#[async_trait]
impl PostRepository for MySqlPostRepository {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Post>> {
        let query = r#"
            SELECT id, title, slug, status, pdf_path, zip_path, created_at
            FROM posts
            WHERE id = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Database query failed: {}", e),
            })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_post(&row)?)),
            None => Ok(None),
        }
    }
}
