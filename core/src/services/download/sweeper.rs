//! Background sweep of expired download tokens.
//!
//! Lazy eviction on lookup keeps redemption correct on its own; the sweep
//! bounds the memory held by issued-but-never-redeemed tokens.

use std::sync::Arc;
use tracing::{error, info};

use crate::errors::DomainResult;
use crate::services::stores::TokenStore;

/// Periodic expired-token reaper
pub struct TokenSweeper<T: TokenStore + 'static> {
    store: Arc<T>,
    interval_seconds: u64,
}

impl<T: TokenStore> TokenSweeper<T> {
    pub fn new(store: Arc<T>, interval_seconds: u64) -> Self {
        Self {
            store,
            interval_seconds,
        }
    }

    /// Runs a single sweep cycle.
    pub async fn run_sweep(&self) -> DomainResult<usize> {
        let purged = self.store.purge_expired().await?;
        if purged > 0 {
            info!(purged, "Swept expired download tokens");
        }
        Ok(purged)
    }

    /// Spawns the sweep loop as a background task.
    pub fn start_background_task(self: Arc<Self>) {
        let interval = std::time::Duration::from_secs(self.interval_seconds);

        tokio::spawn(async move {
            info!(
                interval_seconds = self.interval_seconds,
                "Token sweeper started"
            );

            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; skip it so a fresh start
            // does not race store initialization.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if let Err(e) = self.run_sweep().await {
                    error!(error = %e, "Token sweep cycle failed");
                }
            }
        });
    }
}
