//! Feed Source Port - Raw Feed Retrieval Interface
//!
//! Defines the trait for obtaining the published spreadsheet as CSV
//! text. The loader never knows whether the text came over HTTP, from
//! a fixture, or from a mock.

use async_trait::async_trait;

use crate::domain::FeedResult;

/// Trait for CSV feed providers.
///
/// Implementors perform a single retrieval per call. Any failure to
/// obtain the text (unreachable host, non-success status, unreadable
/// body) must surface as `FeedError::Network`.
#[async_trait]
pub trait FeedSource: Send + Sync + 'static {
  /// Fetch the full CSV document.
  async fn fetch_csv(&self) -> FeedResult<String>;

  /// Human-readable origin of the feed (usually its URL), used in logs
  /// and snapshots.
  fn origin(&self) -> String;
}
