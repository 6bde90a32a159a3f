//! Image Probe - Fetch and Decode over HTTP
//!
//! Implements the `MediaProbe` port: downloads an image and decodes it
//! on the blocking pool so the caller knows it is renderable.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use image::ImageReader;
use tracing::trace;

use super::client::FeedClient;
use crate::ports::{MediaDimensions, MediaProbe};

/// Probes images through the feed client's HTTP connection pool.
pub struct HttpImageProbe {
  client: Arc<FeedClient>,
  /// Upper bound for fetch + decode of one image.
  timeout: Duration,
}

impl HttpImageProbe {
  pub fn new(client: Arc<FeedClient>, timeout: Duration) -> Self {
    Self { client, timeout }
  }
}

#[async_trait]
impl MediaProbe for HttpImageProbe {
  async fn probe(&self, url: &str) -> Result<MediaDimensions> {
    let work = async {
      let bytes = self.client.fetch_bytes(url).await?;
      trace!(url, bytes = bytes.len(), "Image downloaded");
      tokio::task::spawn_blocking(move || decode_dimensions(&bytes))
        .await
        .context("decode task panicked")?
    };

    tokio::time::timeout(self.timeout, work)
      .await
      .with_context(|| format!("probe of {url} timed out"))?
  }
}

/// Fully decode an in-memory image and report its dimensions.
pub fn decode_dimensions(bytes: &[u8]) -> Result<MediaDimensions> {
  let image = ImageReader::new(Cursor::new(bytes))
    .with_guessed_format()
    .context("sniff image format")?
    .decode()
    .context("decode image")?;

  Ok(MediaDimensions {
    width: image.width(),
    height: image.height(),
  })
}
