//! Post repository interface and mock implementation.
//!
//! Posts are managed elsewhere; the download engine only reads them to
//! resolve attachments, so the interface is lookup-only.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::post::Post;
use crate::errors::DomainResult;

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Post>>;
}

/// In-memory post repository for tests
#[doc(hidden)]
pub struct MockPostRepository {
    posts: Arc<RwLock<HashMap<Uuid, Post>>>,
}

impl MockPostRepository {
    pub fn new() -> Self {
        Self {
            posts: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn insert(&self, post: Post) {
        self.posts.write().await.insert(post.id, post);
    }
}

impl Default for MockPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostRepository for MockPostRepository {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Post>> {
        let posts = self.posts.read().await;
        Ok(posts.get(&id).cloned())
    }
}
