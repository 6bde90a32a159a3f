//! Media Probe Port - Image Retrieval and Decode Interface
//!
//! Used by the preloader to make sure every referenced image can be
//! fetched and decoded before content is shown.

use async_trait::async_trait;
use serde::Serialize;

/// Decoded image dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MediaDimensions {
  pub width: u32,
  pub height: u32,
}

/// Trait for fetching and decoding a single image.
#[async_trait]
pub trait MediaProbe: Send + Sync + 'static {
  /// Fetch `url` and decode enough of it to learn its dimensions.
  async fn probe(&self, url: &str) -> anyhow::Result<MediaDimensions>;
}
