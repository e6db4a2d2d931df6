//! Background refresher for periodic synchronization
//!
//! Runs a sync pass immediately on start and then once per configured
//! interval. Each pass is wrapped in its own bounded retry loop with
//! exponential backoff, independent of the interval timer. A shutdown
//! broadcast cancels the refresher at any suspension point: mid-pass,
//! mid-backoff, or while idling between ticks.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tokio::time::{interval_at, Instant};
use tracing::{error, info, warn};

use super::backoff::ExponentialBackoff;
use super::syncer::SyncReport;
use crate::config::{RetryConfig, SyncConfig};
use crate::error::FetchError;

/// Trait for sources the refresher can drive
///
/// Implemented by [`Syncer`](super::Syncer); tests substitute fakes.
#[async_trait]
pub trait Syncable: Send + Sync {
    /// Perform one synchronization pass
    async fn sync(&self) -> Result<SyncReport, FetchError>;
}

/// Periodic scheduler around a [`Syncable`] source
pub struct Refresher<S: Syncable> {
    syncer: Arc<S>,
    interval: Duration,
    max_attempts: u32,
    backoff: ExponentialBackoff,
}

impl<S: Syncable> Refresher<S> {
    /// Create a refresher from the sync configuration section
    pub fn new(syncer: Arc<S>, config: &SyncConfig) -> Self {
        Self::with_schedule(syncer, config.interval(), &config.retry)
    }

    /// Create a refresher with an explicit interval
    pub fn with_schedule(syncer: Arc<S>, interval: Duration, retry: &RetryConfig) -> Self {
        Self {
            syncer,
            interval,
            max_attempts: retry.max_attempts.max(1),
            backoff: ExponentialBackoff::from_config(retry),
        }
    }

    /// Run until the shutdown broadcast fires
    ///
    /// The first pass starts immediately, not after a delay. A pass
    /// that exhausts its retry budget is logged and the refresher
    /// simply waits for the next regular tick.
    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) {
        info!(
            interval_secs = self.interval.as_secs(),
            max_attempts = self.max_attempts,
            "Starting background refresher"
        );

        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("Refresher stopped during sync");
                    return;
                }
                _ = self.sync_with_retry() => {}
            }

            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("Refresher stopped");
                    return;
                }
                _ = ticker.tick() => {}
            }
        }
    }

    /// Run one pass, retrying failures with backoff up to the budget
    async fn sync_with_retry(&self) {
        for attempt in 0..self.max_attempts {
            match self.syncer.sync().await {
                Ok(report) => {
                    info!(
                        upserted = report.upserted,
                        failed = report.failed,
                        "Background sync successful"
                    );
                    return;
                }
                Err(e) => {
                    if attempt + 1 >= self.max_attempts {
                        error!(
                            attempts = self.max_attempts,
                            error = %e,
                            "Background sync failed after max retry attempts"
                        );
                        return;
                    }

                    let wait = self.backoff.duration(attempt);
                    warn!(
                        attempt = attempt + 1,
                        retry_in_ms = wait.as_millis() as u64,
                        error = %e,
                        "Sync failed, retrying later"
                    );
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }
}
