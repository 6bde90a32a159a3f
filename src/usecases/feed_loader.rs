//! Portfolio Feed Loader - Fetch, Map, Snapshot
//!
//! Single-shot load of the published spreadsheet:
//! - Retrieve the CSV through the `FeedSource` port
//! - Map it into `PortfolioData` (trim, default, classify, rewrite,
//!   bucket, sort)
//! - Wrap the result in an immutable `FeedSnapshot`
//!
//! Any failure is terminal for the load; no partial mapping escapes.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use crate::domain::{DeliveryOptions, FeedResult, FeedSnapshot, PortfolioData, parse_feed};
use crate::ports::{FeedMetricsSink, FeedSource};

/// Loads the portfolio from a feed source.
pub struct PortfolioFeedLoader<S: FeedSource> {
  /// Feed port.
  source: Arc<S>,
  /// Delivery rewriting parameters.
  delivery: DeliveryOptions,
  /// Optional metrics sink.
  metrics: Option<Arc<dyn FeedMetricsSink>>,
}

impl<S: FeedSource> PortfolioFeedLoader<S> {
  /// Create a new loader.
  pub fn new(source: Arc<S>, delivery: DeliveryOptions) -> Self {
    Self {
      source,
      delivery,
      metrics: None,
    }
  }

  /// Record load outcomes in `metrics`.
  #[must_use]
  pub fn with_metrics(mut self, metrics: Arc<impl FeedMetricsSink>) -> Self {
    self.metrics = Some(metrics as Arc<dyn FeedMetricsSink>);
    self
  }

  pub fn origin(&self) -> String {
    self.source.origin()
  }

  /// Fetch and map the feed.
  #[instrument(skip(self), fields(origin = %self.source.origin()))]
  pub async fn load(&self) -> FeedResult<PortfolioData> {
    let started = Instant::now();
    let result = self.fetch_and_parse().await;
    let elapsed = started.elapsed().as_secs_f64();

    match &result {
      Ok(data) => {
        info!(
          sections = data.section_count(),
          items = data.total_items(),
          elapsed_ms = started.elapsed().as_millis(),
          "Portfolio feed loaded"
        );
        if let Some(metrics) = &self.metrics {
          metrics.record_success(data, elapsed);
        }
      }
      Err(e) => {
        warn!(error = %e, "Portfolio feed load failed");
        if let Some(metrics) = &self.metrics {
          metrics.record_failure(e, elapsed);
        }
      }
    }

    result
  }

  /// Fetch and map the feed into a timestamped snapshot.
  pub async fn load_snapshot(&self) -> FeedResult<FeedSnapshot> {
    let data = self.load().await?;
    Ok(FeedSnapshot::new(self.source.origin(), data))
  }

  async fn fetch_and_parse(&self) -> FeedResult<PortfolioData> {
    let text = self.source.fetch_csv().await?;
    debug!(bytes = text.len(), "Parsing feed");
    parse_feed(&text, &self.delivery)
  }
}
