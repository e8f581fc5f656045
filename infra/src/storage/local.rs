//! Local-disk file store.
//!
//! Stored attachment paths are relative to a single storage root.
//! Resolution canonicalizes the joined path and requires it to stay
//! under the canonicalized root; escapes and missing files both resolve
//! to `None` so callers cannot tell them apart.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::warn;

use vault_core::errors::{DomainError, DomainResult};
use vault_core::services::{FileStore, ResolvedFile};

pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Joins a stored path onto the root, treating it as relative even
    /// when it carries a leading slash.
    fn candidate(&self, stored_path: &str) -> PathBuf {
        let relative = stored_path.trim_start_matches('/');
        self.root.join(relative)
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn resolve(&self, stored_path: &str) -> DomainResult<Option<ResolvedFile>> {
        let root = tokio::fs::canonicalize(&self.root)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Storage root unavailable: {}", e),
            })?;

        let candidate = self.candidate(stored_path);

        // Canonicalization fails for paths that do not exist; missing
        // files and dangling traversal attempts end up here together.
        let resolved = match tokio::fs::canonicalize(&candidate).await {
            Ok(p) => p,
            Err(_) => return Ok(None),
        };

        if !resolved.starts_with(&root) {
            warn!(
                event = "storage_path_escape",
                stored_path = %stored_path,
                "Stored path resolved outside the storage root"
            );
            return Ok(None);
        }

        if !tokio::fs::metadata(&resolved)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
        {
            return Ok(None);
        }

        let file_name = file_name_of(&resolved);
        Ok(Some(ResolvedFile {
            path: resolved,
            file_name,
        }))
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "download".to_string())
}
