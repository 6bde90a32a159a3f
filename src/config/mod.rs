//! Configuration Module - TOML-based Service Configuration
//!
//! Loads and validates configuration from `config.toml` with an
//! environment variable override for the feed URL.
//! The feed location and delivery parameters are externalized
//! here - nothing is hardcoded in the domain layer.

pub mod loader;

use serde::Deserialize;

use crate::domain::DeliveryOptions;

/// Top-level service configuration.
///
/// Loaded from `config.toml` at startup. All fields are validated
/// before the service begins operation.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// Service identity and logging.
  #[serde(default)]
  pub service: ServiceConfig,
  /// Published spreadsheet feed.
  pub feed: FeedConfig,
  /// Delivery URL rewriting.
  #[serde(default)]
  pub delivery: DeliveryOptions,
  /// Image preloading.
  #[serde(default)]
  pub preload: PreloadConfig,
  /// HTTP surface (portfolio JSON, probes, metrics).
  #[serde(default)]
  pub server: ServerConfig,
}

/// Service identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
  /// Human-readable service name.
  #[serde(default = "default_name")]
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
}

impl Default for ServiceConfig {
  fn default() -> Self {
    Self {
      name: default_name(),
      log_level: default_log_level(),
    }
  }
}

/// Feed retrieval configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
  /// Published CSV URL (`.../pub?output=csv`).
  pub url: String,
  /// Request timeout in milliseconds.
  #[serde(default = "default_timeout_ms")]
  pub timeout_ms: u64,
  /// Retries on transient failures (transport, 429, 5xx).
  #[serde(default = "default_max_retries")]
  pub max_retries: u32,
  /// Base delay for exponential backoff (milliseconds).
  #[serde(default = "default_retry_delay_ms")]
  pub retry_base_delay_ms: u64,
  /// Re-fetch interval in seconds. 0 = load once.
  #[serde(default)]
  pub refresh_interval_seconds: u64,
}

/// Image preload configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PreloadConfig {
  /// Probe every image after each successful load.
  #[serde(default)]
  pub enabled: bool,
  /// Maximum images fetched concurrently.
  #[serde(default = "default_preload_concurrency")]
  pub max_concurrent: usize,
  /// Per-image timeout in milliseconds.
  #[serde(default = "default_timeout_ms")]
  pub timeout_ms: u64,
}

impl Default for PreloadConfig {
  fn default() -> Self {
    Self {
      enabled: false,
      max_concurrent: default_preload_concurrency(),
      timeout_ms: default_timeout_ms(),
    }
  }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  /// Serve the portfolio/health/metrics endpoints.
  #[serde(default = "default_true")]
  pub enabled: bool,
  /// Bind address.
  #[serde(default = "default_bind_address")]
  pub bind_address: String,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      enabled: true,
      bind_address: default_bind_address(),
    }
  }
}

// Default value functions for serde

fn default_name() -> String {
  "portfolio-feed".to_string()
}

fn default_log_level() -> String {
  "info".to_string()
}

const fn default_true() -> bool {
  true
}

const fn default_timeout_ms() -> u64 {
  10_000
}

const fn default_max_retries() -> u32 {
  2
}

const fn default_retry_delay_ms() -> u64 {
  250
}

const fn default_preload_concurrency() -> usize {
  8
}

fn default_bind_address() -> String {
  "0.0.0.0:8080".to_string()
}
