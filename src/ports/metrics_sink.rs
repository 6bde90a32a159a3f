//! Metrics Sink Port - Load and Preload Outcome Recording
//!
//! Use cases report outcomes through this trait; the Prometheus
//! adapter is one implementation.

use crate::domain::{FeedError, PortfolioData};

/// Receives feed load and image preload outcomes.
pub trait FeedMetricsSink: Send + Sync + 'static {
  /// A load produced `data` after `elapsed_secs`.
  fn record_success(&self, data: &PortfolioData, elapsed_secs: f64);

  /// A load failed with `error` after `elapsed_secs`.
  fn record_failure(&self, error: &FeedError, elapsed_secs: f64);

  /// One preload pass finished.
  fn record_preload(&self, decoded: usize, failed: usize);
}
