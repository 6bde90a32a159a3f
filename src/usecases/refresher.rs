//! Feed Refresher - Periodic Re-load with Snapshot Broadcast
//!
//! Loads the feed once at startup and, when an interval is configured,
//! re-loads it on that interval. Each successful load replaces the
//! published snapshot wholesale via a `tokio::sync::watch` channel;
//! a failed load keeps whatever was published before.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tracing::{debug, info, instrument, warn};

use super::feed_loader::PortfolioFeedLoader;
use crate::domain::{FeedResult, FeedSnapshot};
use crate::ports::FeedSource;

/// Latest published snapshot; `None` until the first successful load.
pub type SnapshotReceiver = watch::Receiver<Option<Arc<FeedSnapshot>>>;

/// Re-loads the feed and publishes immutable snapshots.
pub struct FeedRefresher<S: FeedSource> {
    /// Loader used for every refresh.
    loader: Arc<PortfolioFeedLoader<S>>,
    /// Refresh period. Zero means load once.
    interval: Duration,
    /// Snapshot publisher.
    snapshot_tx: watch::Sender<Option<Arc<FeedSnapshot>>>,
}

impl<S: FeedSource> FeedRefresher<S> {
    /// Create a new refresher.
    ///
    /// Returns the refresher and a receiver that consumers use to read
    /// the current snapshot and get notified of replacements.
    pub fn new(loader: Arc<PortfolioFeedLoader<S>>, interval: Duration) -> (Self, SnapshotReceiver) {
        let (snapshot_tx, snapshot_rx) = watch::channel(None);
        let refresher = Self {
            loader,
            interval,
            snapshot_tx,
        };
        (refresher, snapshot_rx)
    }

    pub fn subscribe(&self) -> SnapshotReceiver {
        self.snapshot_tx.subscribe()
    }

    /// Currently published snapshot.
    pub fn current(&self) -> Option<Arc<FeedSnapshot>> {
        self.snapshot_tx.borrow().clone()
    }

    /// Load once and publish on success.
    ///
    /// On failure the previous snapshot stays published and the error is
    /// returned to the caller.
    pub async fn refresh_once(&self) -> FeedResult<Arc<FeedSnapshot>> {
        match self.loader.load_snapshot().await {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                self.snapshot_tx.send_replace(Some(Arc::clone(&snapshot)));
                debug!(items = snapshot.data.total_items(), "Snapshot published");
                Ok(snapshot)
            }
            Err(e) => {
                let kept = self.snapshot_tx.borrow().is_some();
                warn!(error = %e, kept_previous = kept, "Feed refresh failed");
                Err(e)
            }
        }
    }

    /// Run the refresh loop.
    ///
    /// Performs one load immediately, then one per interval until a
    /// shutdown signal arrives. With a zero interval it returns after
    /// the first load.
    #[instrument(skip(self, shutdown_rx), fields(interval_secs = self.interval.as_secs()))]
    pub async fn run(&self, mut shutdown_rx: broadcast::Receiver<()>) {
        let _ = self.refresh_once().await;

        if self.interval.is_zero() {
            info!("Single load complete - periodic refresh disabled");
            return;
        }

        info!(origin = %self.loader.origin(), "Feed refresher started");

        loop {
            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => {
                    info!("Feed refresher shutting down");
                    return;
                }
                () = tokio::time::sleep(self.interval) => {
                    let _ = self.refresh_once().await;
                }
            }
        }
    }
}
