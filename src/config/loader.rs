//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, applying the `PORTFOLIO_FEED_URL`
//! override, validating all parameters, and providing clear error
//! messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;

/// Environment variable that replaces `feed.url`.
pub const FEED_URL_ENV: &str = "PORTFOLIO_FEED_URL";

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let mut config = parse_config(&content)?;

  if let Ok(url) = std::env::var(FEED_URL_ENV) {
    if !url.trim().is_empty() {
      config.feed.url = url.trim().to_string();
    }
  }

  validate_config(&config)?;

  info!(
    feed = %config.feed.url,
    refresh_secs = config.feed.refresh_interval_seconds,
    preload = config.preload.enabled,
    server = config.server.enabled,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Parse configuration text without touching the environment.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  toml::from_str(content).with_context(|| "Failed to parse config.toml")
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - An absolute http(s) feed URL
/// - Positive timeouts and concurrency
/// - Image quality in 1..=100, non-zero width
pub fn validate_config(config: &AppConfig) -> Result<()> {
  // Feed validation
  let feed_url = url::Url::parse(&config.feed.url)
    .with_context(|| format!("feed.url is not a valid URL: {:?}", config.feed.url))?;
  anyhow::ensure!(
    matches!(feed_url.scheme(), "http" | "https"),
    "feed.url must use http or https, got {}",
    feed_url.scheme()
  );
  anyhow::ensure!(
    config.feed.timeout_ms > 0,
    "feed.timeout_ms must be positive"
  );
  anyhow::ensure!(
    config.feed.max_retries <= 10,
    "feed.max_retries must be at most 10, got {}",
    config.feed.max_retries
  );

  // Delivery validation
  anyhow::ensure!(
    (1..=100).contains(&config.delivery.image_quality),
    "delivery.image_quality must be in [1, 100], got {}",
    config.delivery.image_quality
  );
  anyhow::ensure!(
    config.delivery.image_width > 0,
    "delivery.image_width must be positive"
  );

  // Preload validation
  anyhow::ensure!(
    config.preload.max_concurrent > 0,
    "preload.max_concurrent must be positive"
  );
  anyhow::ensure!(
    config.preload.timeout_ms > 0,
    "preload.timeout_ms must be positive"
  );

  // Server validation
  if config.server.enabled {
    config
      .server
      .bind_address
      .parse::<std::net::SocketAddr>()
      .with_context(|| {
        format!("server.bind_address is invalid: {}", config.server.bind_address)
      })?;
  }

  Ok(())
}
