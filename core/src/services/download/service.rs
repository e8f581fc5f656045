//! Download service: mints and redeems single-use download tokens.
//!
//! One download attempt walks
//! `quota check -> token mint -> [client redeems] -> token validation ->
//! quota recheck -> file resolution -> ledger append -> stream`.
//! Rejections are terminal; the client re-requests a link, never the
//! engine.

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::entities::download_token::DownloadToken;
use crate::domain::entities::post::FileKind;
use crate::errors::{DomainResult, DownloadError};
use crate::repositories::{DownloadRepository, PostRepository};
use crate::services::stores::TokenStore;

use super::config::DownloadConfig;
use super::files::FileStore;
use super::quota::{QuotaStatus, QuotaTracker};

/// A freshly minted download link
#[derive(Debug, Clone)]
pub struct MintedLink {
    /// Opaque token value to embed in the download URL
    pub token: String,
    pub expires_at: DateTime<Utc>,
    /// Quota standing at mint time
    pub status: QuotaStatus,
}

/// A redeemed token, ready for streaming
#[derive(Debug, Clone)]
pub struct RedeemedFile {
    /// Absolute path inside the storage root
    pub path: PathBuf,
    /// Basename for the content-disposition header
    pub file_name: String,
    pub kind: FileKind,
    pub post_id: Uuid,
}

/// Download authorization service
pub struct DownloadService<P, D, T, F>
where
    P: PostRepository,
    D: DownloadRepository,
    T: TokenStore,
    F: FileStore,
{
    post_repository: Arc<P>,
    token_store: Arc<T>,
    file_store: Arc<F>,
    quota: QuotaTracker<D>,
}

impl<P, D, T, F> DownloadService<P, D, T, F>
where
    P: PostRepository,
    D: DownloadRepository,
    T: TokenStore,
    F: FileStore,
{
    pub fn new(
        post_repository: Arc<P>,
        download_repository: Arc<D>,
        token_store: Arc<T>,
        file_store: Arc<F>,
        config: DownloadConfig,
    ) -> Self {
        Self {
            post_repository,
            token_store,
            file_store,
            quota: QuotaTracker::new(download_repository, config),
        }
    }

    pub fn quota(&self) -> &QuotaTracker<D> {
        &self.quota
    }

    /// Mints a single-use download token for `(user, post, kind)`.
    ///
    /// Precondition order: quota, post existence, attachment presence,
    /// stored file resolution. The caller is already authenticated and
    /// `kind`/`post_id` are already syntactically valid at this layer.
    pub async fn mint(
        &self,
        user_id: Uuid,
        post_id: Uuid,
        kind: FileKind,
    ) -> DomainResult<MintedLink> {
        let status = self.quota.check_daily_limit(user_id).await?;
        if status.limit_reached {
            warn!(
                user_id = %user_id,
                count = status.count,
                event = "mint_quota_exceeded",
                "Refusing to mint link over quota"
            );
            return Err(DownloadError::QuotaExceeded {
                count: status.count,
                remaining: status.remaining,
                limit: self.quota.limit(),
            }
            .into());
        }

        let post = self
            .post_repository
            .find_by_id(post_id)
            .await?
            .ok_or(DownloadError::PostNotFound)?;

        let stored_path = post
            .attachment_path(kind)
            .ok_or_else(|| DownloadError::AttachmentMissing {
                kind: kind.to_string(),
            })?;

        // The link must not outlive the file it points at.
        if self.file_store.resolve(stored_path).await?.is_none() {
            return Err(DownloadError::FileMissing.into());
        }

        let token = DownloadToken::mint(user_id, post_id, kind);
        let minted = MintedLink {
            token: token.token.clone(),
            expires_at: token.expires_at,
            status,
        };
        self.token_store.insert(token).await?;

        info!(
            user_id = %user_id,
            post_id = %post_id,
            kind = %kind,
            event = "link_minted",
            "Minted download link"
        );

        Ok(minted)
    }

    /// Redeems a token: validates it, re-checks quota, resolves the file,
    /// appends one ledger entry and consumes the token.
    ///
    /// The quota recheck closes the race where several links are minted
    /// under the cap and all redeemed after it would be exceeded.
    pub async fn redeem(
        &self,
        token_value: &str,
        caller: Uuid,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> DomainResult<RedeemedFile> {
        let token = match self.token_store.get(token_value).await? {
            Some(t) => t,
            None => return Err(DownloadError::InvalidOrExpired.into()),
        };

        // Lazy eviction: an expired token is deleted on first lookup,
        // independent of the periodic sweep.
        if token.is_expired() {
            self.token_store.remove(token_value).await?;
            return Err(DownloadError::InvalidOrExpired.into());
        }

        if !token.is_owned_by(caller) {
            warn!(
                caller = %caller,
                owner = %token.user_id,
                event = "redeem_ownership_mismatch",
                "Token redeemed by non-owner"
            );
            return Err(DownloadError::OwnershipMismatch.into());
        }

        let status = self.quota.check_daily_limit(caller).await?;
        if status.limit_reached {
            return Err(DownloadError::QuotaExceeded {
                count: status.count,
                remaining: status.remaining,
                limit: self.quota.limit(),
            }
            .into());
        }

        let post = self
            .post_repository
            .find_by_id(token.post_id)
            .await?
            .ok_or(DownloadError::PostNotFound)?;

        let stored_path = post
            .attachment_path(token.kind)
            .ok_or(DownloadError::FileMissing)?;

        let resolved = self
            .file_store
            .resolve(stored_path)
            .await?
            .ok_or(DownloadError::FileMissing)?;

        // Ledger append happens once per successful redemption. A write
        // failure is logged but does not abort the transfer.
        if let Err(e) = self
            .quota
            .record(
                caller,
                token.post_id,
                token.kind,
                resolved.file_name.clone(),
                ip_address,
                user_agent,
            )
            .await
        {
            error!(
                user_id = %caller,
                post_id = %token.post_id,
                error = %e,
                event = "ledger_append_failed",
                "Failed to record download"
            );
        }

        // Single use: the token dies with its redemption.
        self.token_store.remove(token_value).await?;

        info!(
            user_id = %caller,
            post_id = %token.post_id,
            kind = %token.kind,
            file = %resolved.file_name,
            event = "download_redeemed",
            "Download token redeemed"
        );

        Ok(RedeemedFile {
            path: resolved.path,
            file_name: resolved.file_name,
            kind: token.kind,
            post_id: token.post_id,
        })
    }
}
