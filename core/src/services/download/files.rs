//! File store interface.
//!
//! The download engine never touches the filesystem directly; resolution
//! and containment checks live behind this trait (local-disk
//! implementation in the infrastructure crate).

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::errors::DomainResult;

/// A stored path resolved to a real file inside the storage root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    /// Absolute path, safe to open
    pub path: PathBuf,
    /// Basename to present in the content-disposition header
    pub file_name: String,
}

/// Interface for resolving stored attachment paths.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Resolves a stored path against the storage root.
    ///
    /// Returns `Ok(None)` both when the file does not exist and when the
    /// path escapes the root; callers treat the two identically so path
    /// probing leaks nothing.
    async fn resolve(&self, stored_path: &str) -> DomainResult<Option<ResolvedFile>>;
}

/// In-memory file store for tests: a map of known stored paths.
#[doc(hidden)]
pub struct MockFileStore {
    files: Arc<RwLock<HashMap<String, ResolvedFile>>>,
}

impl MockFileStore {
    pub fn new() -> Self {
        Self {
            files: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn insert(&self, stored_path: &str) {
        let file_name = stored_path
            .rsplit('/')
            .next()
            .unwrap_or(stored_path)
            .to_string();
        self.files.write().await.insert(
            stored_path.to_string(),
            ResolvedFile {
                path: PathBuf::from("/storage").join(stored_path),
                file_name,
            },
        );
    }
}

impl Default for MockFileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileStore for MockFileStore {
    async fn resolve(&self, stored_path: &str) -> DomainResult<Option<ResolvedFile>> {
        // Traversal attempts resolve to nothing, like the real store.
        if stored_path.contains("..") {
            return Ok(None);
        }
        Ok(self.files.read().await.get(stored_path).cloned())
    }
}
