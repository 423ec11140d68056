use crate::domain_port::TokenCache;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Periodically drops expired tokens that nobody has read since they expired.
pub struct CacheSweeper {
    token_cache: Arc<dyn TokenCache>,
    interval: Duration,
    cancellation_token: CancellationToken,
}

impl CacheSweeper {
    pub fn new(
        token_cache: Arc<dyn TokenCache>,
        interval: Duration,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self {
            token_cache,
            interval,
            cancellation_token,
        }
    }

    fn tick_once(&self) -> usize {
        let removed = self.token_cache.purge_expired(Utc::now());
        if removed > 0 {
            tracing::debug!(removed, "purged expired tokens");
        }
        removed
    }

    pub async fn run(&self) {
        let mut ticker = tokio::time::interval(self.interval);
        // the first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                biased;
                _ = self.cancellation_token.cancelled() => {
                    tracing::info!("CacheSweeper shutting down...");
                    break;
                }
                _ = ticker.tick() => {
                    self.tick_once();
                }
            }
        }
    }
}
