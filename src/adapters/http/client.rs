//! Feed HTTP Client - Timeout + Retry Wrapper over reqwest
//!
//! Retrieves the published spreadsheet CSV. Transient failures
//! (transport errors, 429, 5xx) are retried with exponential backoff;
//! any other non-success status fails immediately.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tokio::time::sleep;
use tracing::{debug, instrument, warn};

use crate::config::FeedConfig;
use crate::domain::{FeedError, FeedResult};
use crate::ports::FeedSource;

/// Configuration for the feed HTTP client.
#[derive(Debug, Clone)]
pub struct FeedClientConfig {
  /// Published CSV URL.
  pub url: String,
  /// Request timeout.
  pub timeout: Duration,
  /// Maximum retries on transient errors.
  pub max_retries: u32,
  /// Base delay between retries (exponential backoff).
  pub retry_base_delay: Duration,
}

impl FeedClientConfig {
  /// Client settings for a feed section of `config.toml`.
  pub fn from_feed_config(feed: &FeedConfig) -> Self {
    Self {
      url: feed.url.clone(),
      timeout: Duration::from_millis(feed.timeout_ms),
      max_retries: feed.max_retries,
      retry_base_delay: Duration::from_millis(feed.retry_base_delay_ms),
    }
  }
}

/// Outcome of a single attempt, before retry policy is applied.
enum Attempt {
  Done(String),
  Retry(FeedError),
  Fail(FeedError),
}

/// Delay before retry number `attempt` (1-based): base, 2x base, 4x base...
/// Saturates instead of overflowing for large attempt counts.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
  base.saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
}

/// HTTP client for the published CSV feed.
pub struct FeedClient {
  /// Underlying HTTP client.
  http: Client,
  /// Client configuration.
  config: FeedClientConfig,
}

impl FeedClient {
  /// Create a new feed client.
  pub fn new(config: FeedClientConfig) -> anyhow::Result<Self> {
    let http = Client::builder()
      .timeout(config.timeout)
      .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
      .pool_max_idle_per_host(5)
      .build()
      .context("Failed to build HTTP client")?;

    Ok(Self { http, config })
  }

  pub fn config(&self) -> &FeedClientConfig {
    &self.config
  }

  /// Shared reqwest client, reused by the image probe.
  pub fn http(&self) -> &Client {
    &self.http
  }

  /// Fetch the feed text, retrying transient failures.
  ///
  /// A body that is not valid UTF-8 fails with `FeedError::Parse`
  /// and is not retried.
  #[instrument(skip(self), fields(url = %self.config.url))]
  pub async fn fetch_text(&self) -> FeedResult<String> {
    let mut last_error = None;

    for attempt in 0..=self.config.max_retries {
      if attempt > 0 {
        let delay = backoff_delay(self.config.retry_base_delay, attempt);
        debug!(attempt, delay_ms = delay.as_millis(), "Retrying feed request");
        sleep(delay).await;
      }

      match self.attempt().await {
        Attempt::Done(text) => {
          debug!(bytes = text.len(), attempt, "Feed retrieved");
          return Ok(text);
        }
        Attempt::Retry(err) => {
          warn!(error = %err, attempt, "Transient feed failure");
          last_error = Some(err);
        }
        Attempt::Fail(err) => return Err(err),
      }
    }

    Err(last_error.unwrap_or_else(|| {
      FeedError::network(&self.config.url, "max retries exceeded")
    }))
  }

  async fn attempt(&self) -> Attempt {
    let url = &self.config.url;

    let response = match self.http.get(url).send().await {
      Ok(response) => response,
      Err(e) => return Attempt::Retry(FeedError::network(url, e.to_string())),
    };

    match response.status() {
      status if status.is_success() => match response.bytes().await {
        Ok(body) => match String::from_utf8(body.to_vec()) {
          Ok(text) => Attempt::Done(text),
          Err(e) => Attempt::Fail(FeedError::parse(None, format!("feed is not valid UTF-8: {e}"))),
        },
        Err(e) => Attempt::Retry(FeedError::network(url, format!("reading body: {e}"))),
      },
      StatusCode::TOO_MANY_REQUESTS => {
        Attempt::Retry(FeedError::status(url, StatusCode::TOO_MANY_REQUESTS.as_u16()))
      }
      status if status.is_server_error() => Attempt::Retry(FeedError::status(url, status.as_u16())),
      status => Attempt::Fail(FeedError::status(url, status.as_u16())),
    }
  }

  /// Fetch raw bytes of an arbitrary asset (single attempt).
  pub async fn fetch_bytes(&self, url: &str) -> anyhow::Result<Vec<u8>> {
    let response = self
      .http
      .get(url)
      .send()
      .await
      .with_context(|| format!("GET {url}"))?
      .error_for_status()
      .with_context(|| format!("GET {url}"))?;

    let bytes = response
      .bytes()
      .await
      .with_context(|| format!("reading body of {url}"))?;
    Ok(bytes.to_vec())
  }
}

#[async_trait]
impl FeedSource for FeedClient {
  async fn fetch_csv(&self) -> FeedResult<String> {
    self.fetch_text().await
  }

  fn origin(&self) -> String {
    self.config.url.clone()
  }
}
