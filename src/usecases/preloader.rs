//! Media Preloader - Decode Every Image Before Display
//!
//! Fans out one probe per image item, bounded by `max_concurrent`,
//! and waits for all of them. A failing image is counted and logged;
//! it never blocks or aborts the rest of the batch.

use std::sync::Arc;

use futures_util::StreamExt;
use futures_util::stream;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info, instrument};

use super::refresher::SnapshotReceiver;
use crate::domain::{MediaType, PortfolioData};
use crate::ports::{FeedMetricsSink, MediaProbe};

/// Result of one preload pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PreloadReport {
    /// Image URLs probed (duplicates probed once).
    pub attempted: usize,
    pub decoded: usize,
    pub failed: usize,
}

impl PreloadReport {
    pub const fn all_decoded(&self) -> bool {
        self.failed == 0
    }
}

/// Preloads the images referenced by a portfolio.
pub struct MediaPreloader<P: MediaProbe> {
    probe: Arc<P>,
    max_concurrent: usize,
    metrics: Option<Arc<dyn FeedMetricsSink>>,
}

impl<P: MediaProbe> MediaPreloader<P> {
    pub fn new(probe: Arc<P>, max_concurrent: usize) -> Self {
        Self {
            probe,
            max_concurrent: max_concurrent.max(1),
            metrics: None,
        }
    }

    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<impl FeedMetricsSink>) -> Self {
        self.metrics = Some(metrics as Arc<dyn FeedMetricsSink>);
        self
    }

    /// Distinct image URLs of a portfolio, in section order.
    pub fn image_urls(data: &PortfolioData) -> Vec<String> {
        let mut urls: Vec<String> = Vec::new();
        for item in data.items() {
            if item.media_type == MediaType::Image
                && item.has_media()
                && !urls.contains(&item.media_url)
            {
                urls.push(item.media_url.clone());
            }
        }
        urls
    }

    /// Probe every image and wait for all probes to finish.
    #[instrument(skip(self, data))]
    pub async fn preload(&self, data: &PortfolioData) -> PreloadReport {
        let urls = Self::image_urls(data);
        let attempted = urls.len();

        // Owned URLs and probe handle keep the fan-out future `Send`.
        let probe = Arc::clone(&self.probe);
        let outcomes: Vec<bool> = stream::iter(urls)
            .map(move |url: String| {
                let probe = Arc::clone(&probe);
                async move {
                    match probe.probe(&url).await {
                        Ok(dims) => {
                            debug!(url = %url, width = dims.width, height = dims.height, "Image decoded");
                            true
                        }
                        Err(e) => {
                            debug!(url = %url, error = %e, "Image preload failed");
                            false
                        }
                    }
                }
            })
            .buffer_unordered(self.max_concurrent)
            .collect()
            .await;

        let decoded = outcomes.iter().filter(|ok| **ok).count();
        let report = PreloadReport {
            attempted,
            decoded,
            failed: attempted - decoded,
        };

        if let Some(metrics) = &self.metrics {
            metrics.record_preload(report.decoded, report.failed);
        }
        info!(
            attempted = report.attempted,
            decoded = report.decoded,
            failed = report.failed,
            "Image preload complete"
        );
        report
    }

    /// Preload every snapshot published on `snapshot_rx` until shutdown.
    pub async fn run(&self, mut snapshot_rx: SnapshotReceiver, mut shutdown_rx: broadcast::Receiver<()>) {
        loop {
            let current = snapshot_rx.borrow_and_update().clone();
            if let Some(snapshot) = current {
                self.preload(&snapshot.data).await;
            }

            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => return,
                changed = snapshot_rx.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
            }
        }
    }
}
