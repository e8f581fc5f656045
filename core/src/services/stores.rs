//! Ephemeral store interfaces and their in-memory implementations.
//!
//! Pending registrations, reset requests and download tokens are
//! process-lifetime state with wall-clock expiry. The traits keep the
//! services agnostic of the backing store, so a shared external cache can
//! replace the in-memory maps under multi-process deployment without
//! touching the services. The in-memory implementations are the default
//! wiring: owned maps behind an async `RwLock`, constructed at startup and
//! injected - no module-level mutable state.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::download_token::DownloadToken;
use crate::domain::entities::password_reset::PasswordResetRequest;
use crate::domain::entities::pending_registration::PendingRegistration;
use crate::errors::DomainResult;

/// Store for registrations awaiting OTP verification, keyed by email.
#[async_trait]
pub trait PendingStore: Send + Sync {
    /// Inserts an entry, replacing any prior entry for the same email
    /// (last write wins).
    async fn put(&self, entry: PendingRegistration) -> DomainResult<()>;

    async fn get(&self, email: &str) -> DomainResult<Option<PendingRegistration>>;

    async fn remove(&self, email: &str) -> DomainResult<()>;
}

/// Store for password resets awaiting OTP confirmation, keyed by email.
#[async_trait]
pub trait ResetStore: Send + Sync {
    async fn put(&self, entry: PasswordResetRequest) -> DomainResult<()>;

    async fn get(&self, email: &str) -> DomainResult<Option<PasswordResetRequest>>;

    async fn remove(&self, email: &str) -> DomainResult<()>;
}

/// Store for minted download tokens, keyed by token value.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn insert(&self, token: DownloadToken) -> DomainResult<()>;

    async fn get(&self, token: &str) -> DomainResult<Option<DownloadToken>>;

    async fn remove(&self, token: &str) -> DomainResult<()>;

    /// Deletes every expired entry; returns how many were removed.
    async fn purge_expired(&self) -> DomainResult<usize>;
}

/// In-memory pending registration store
pub struct MemoryPendingStore {
    entries: Arc<RwLock<HashMap<String, PendingRegistration>>>,
}

impl MemoryPendingStore {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MemoryPendingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PendingStore for MemoryPendingStore {
    async fn put(&self, entry: PendingRegistration) -> DomainResult<()> {
        self.entries.write().await.insert(entry.email.clone(), entry);
        Ok(())
    }

    async fn get(&self, email: &str) -> DomainResult<Option<PendingRegistration>> {
        Ok(self.entries.read().await.get(email).cloned())
    }

    async fn remove(&self, email: &str) -> DomainResult<()> {
        self.entries.write().await.remove(email);
        Ok(())
    }
}

/// In-memory password reset store
pub struct MemoryResetStore {
    entries: Arc<RwLock<HashMap<String, PasswordResetRequest>>>,
}

impl MemoryResetStore {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MemoryResetStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResetStore for MemoryResetStore {
    async fn put(&self, entry: PasswordResetRequest) -> DomainResult<()> {
        self.entries.write().await.insert(entry.email.clone(), entry);
        Ok(())
    }

    async fn get(&self, email: &str) -> DomainResult<Option<PasswordResetRequest>> {
        Ok(self.entries.read().await.get(email).cloned())
    }

    async fn remove(&self, email: &str) -> DomainResult<()> {
        self.entries.write().await.remove(email);
        Ok(())
    }
}

/// In-memory download token store
pub struct MemoryTokenStore {
    entries: Arc<RwLock<HashMap<String, DownloadToken>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

impl Default for MemoryTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn insert(&self, token: DownloadToken) -> DomainResult<()> {
        self.entries.write().await.insert(token.token.clone(), token);
        Ok(())
    }

    async fn get(&self, token: &str) -> DomainResult<Option<DownloadToken>> {
        Ok(self.entries.read().await.get(token).cloned())
    }

    async fn remove(&self, token: &str) -> DomainResult<()> {
        self.entries.write().await.remove(token);
        Ok(())
    }

    async fn purge_expired(&self) -> DomainResult<usize> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, t| !t.is_expired());
        Ok(before - entries.len())
    }
}
