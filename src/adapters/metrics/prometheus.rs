//! Prometheus Metrics Registry - Feed Observability
//!
//! Registers the feed metrics and renders them in the Prometheus
//! text exposition format for the `/metrics` endpoint.

use prometheus::{
    Encoder, Gauge, Histogram, HistogramOpts, IntCounterVec, IntGaugeVec, Opts, Registry,
    TextEncoder,
};

use crate::domain::{FeedError, PortfolioData};
use crate::ports::FeedMetricsSink;

/// Centralized Prometheus metrics for the feed service.
///
/// All metrics follow the naming convention `portfolio_feed_*`.
pub struct FeedMetrics {
    /// Prometheus registry.
    registry: Registry,
    /// Feed loads by outcome (`success`, `network_error`, `parse_error`).
    pub fetches: IntCounterVec,
    /// Wall time of a full load (fetch + parse).
    pub fetch_duration: Histogram,
    /// Items per section in the latest snapshot.
    pub section_items: IntGaugeVec,
    /// Unix time of the latest successful load.
    pub last_success: Gauge,
    /// Image probes by outcome (`decoded`, `failed`).
    pub preload_images: IntCounterVec,
}

impl FeedMetrics {
    /// Create and register all Prometheus metrics.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let fetches = IntCounterVec::new(
            Opts::new("portfolio_feed_fetches_total", "Feed loads by outcome"),
            &["outcome"],
        )?;

        let fetch_duration = Histogram::with_opts(
            HistogramOpts::new(
                "portfolio_feed_fetch_duration_seconds",
                "Feed fetch + parse latency in seconds",
            )
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        )?;

        let section_items = IntGaugeVec::new(
            Opts::new(
                "portfolio_feed_items",
                "Items per section in the latest snapshot",
            ),
            &["section"],
        )?;

        let last_success = Gauge::new(
            "portfolio_feed_last_success_timestamp_seconds",
            "Unix time of the latest successful feed load",
        )?;

        let preload_images = IntCounterVec::new(
            Opts::new(
                "portfolio_feed_preload_images_total",
                "Image preload probes by outcome",
            ),
            &["outcome"],
        )?;

        // Register all metrics
        registry.register(Box::new(fetches.clone()))?;
        registry.register(Box::new(fetch_duration.clone()))?;
        registry.register(Box::new(section_items.clone()))?;
        registry.register(Box::new(last_success.clone()))?;
        registry.register(Box::new(preload_images.clone()))?;

        Ok(Self {
            registry,
            fetches,
            fetch_duration,
            section_items,
            last_success,
            preload_images,
        })
    }

    /// Render every registered metric in text exposition format.
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        if encoder.encode(&metric_families, &mut buffer).is_err() {
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

impl FeedMetricsSink for FeedMetrics {
    /// Record a successful load and replace the per-section gauges.
    fn record_success(&self, data: &PortfolioData, elapsed_secs: f64) {
        self.fetches.with_label_values(&["success"]).inc();
        self.fetch_duration.observe(elapsed_secs);
        self.section_items.reset();
        for (section, items) in data.sections() {
            self.section_items
                .with_label_values(&[section])
                .set(i64::try_from(items.len()).unwrap_or(i64::MAX));
        }
        #[allow(clippy::cast_precision_loss)]
        let now_secs = chrono::Utc::now().timestamp_millis() as f64 / 1000.0;
        self.last_success.set(now_secs);
    }

    fn record_failure(&self, error: &FeedError, elapsed_secs: f64) {
        let outcome = if error.is_parse() {
            "parse_error"
        } else {
            "network_error"
        };
        self.fetches.with_label_values(&[outcome]).inc();
        self.fetch_duration.observe(elapsed_secs);
    }

    fn record_preload(&self, decoded: usize, failed: usize) {
        self.preload_images
            .with_label_values(&["decoded"])
            .inc_by(decoded as u64);
        self.preload_images
            .with_label_values(&["failed"])
            .inc_by(failed as u64);
    }
}
