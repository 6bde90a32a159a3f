//! Portfolio Feed - Entry Point
//!
//! Initializes configuration, logging, the feed client and the
//! snapshot consumers. Runs until SIGINT, or exits after one load when
//! neither the server nor periodic refresh is enabled.
//!
//! Wiring sequence:
//! 1. Load config.toml (path from argv[1]) + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Create FeedClient (HTTP + timeout + retry) and metrics
//! 4. Create PortfolioFeedLoader + FeedRefresher
//! 5. One-shot mode: load, print JSON snapshot, exit
//! 6. Spawn PortfolioServer, MediaPreloader and the refresh loop
//! 7. Wait for SIGINT → broadcast shutdown → join tasks

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info};

use portfolio_feed::adapters::http::{FeedClient, FeedClientConfig, HttpImageProbe};
use portfolio_feed::adapters::metrics::FeedMetrics;
use portfolio_feed::adapters::server::{PortfolioServer, ServerState};
use portfolio_feed::config;
use portfolio_feed::usecases::{FeedRefresher, MediaPreloader, PortfolioFeedLoader};

#[tokio::main]
async fn main() -> Result<()> {
  // ── 1. Load configuration ───────────────────────────────
  let config_path = std::env::args()
    .nth(1)
    .unwrap_or_else(|| "config.toml".to_string());
  let config = config::loader::load_config(&config_path)
    .context("Failed to load configuration")?;

  // ── 2. Initialize structured JSON logging ───────────────
  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.service.log_level)),
    )
    .with_writer(std::io::stderr)
    .json()
    .init();

  info!(
    name = %config.service.name,
    version = env!("CARGO_PKG_VERSION"),
    feed = %config.feed.url,
    "Starting portfolio feed"
  );

  // ── 3. Feed client + metrics ────────────────────────────
  let client = Arc::new(
    FeedClient::new(FeedClientConfig::from_feed_config(&config.feed))
      .context("Failed to create feed client")?,
  );
  let metrics = Arc::new(FeedMetrics::new().context("Failed to register metrics")?);

  // ── 4. Loader + refresher ───────────────────────────────
  let loader = Arc::new(
    PortfolioFeedLoader::new(Arc::clone(&client), config.delivery.clone())
      .with_metrics(Arc::clone(&metrics)),
  );
  let interval = Duration::from_secs(config.feed.refresh_interval_seconds);
  let (refresher, snapshot_rx) = FeedRefresher::new(loader, interval);

  // ── 5. One-shot mode ────────────────────────────────────
  if !config.server.enabled && interval.is_zero() {
    let snapshot = refresher.refresh_once().await.context("Feed load failed")?;
    if config.preload.enabled {
      let probe = Arc::new(HttpImageProbe::new(
        Arc::clone(&client),
        Duration::from_millis(config.preload.timeout_ms),
      ));
      MediaPreloader::new(probe, config.preload.max_concurrent)
        .with_metrics(Arc::clone(&metrics))
        .preload(&snapshot.data)
        .await;
    }
    println!("{}", serde_json::to_string_pretty(snapshot.as_ref())?);
    return Ok(());
  }

  // ── 6. Spawn long-running tasks ─────────────────────────
  let (shutdown_tx, _shutdown_rx) = broadcast::channel::<()>(1);
  let mut handles = Vec::new();

  if config.server.enabled {
    let server = PortfolioServer::new(
      ServerState {
        snapshots: snapshot_rx.clone(),
        metrics: Arc::clone(&metrics),
      },
      config.server.bind_address.clone(),
    );
    let server_shutdown = shutdown_tx.subscribe();
    handles.push(tokio::spawn(async move {
      if let Err(e) = server.run(server_shutdown).await {
        error!(error = %e, "Portfolio server failed");
      }
    }));
  }

  if config.preload.enabled {
    let probe = Arc::new(HttpImageProbe::new(
      Arc::clone(&client),
      Duration::from_millis(config.preload.timeout_ms),
    ));
    let preloader = MediaPreloader::new(probe, config.preload.max_concurrent)
      .with_metrics(Arc::clone(&metrics));
    let preload_rx = snapshot_rx.clone();
    let preload_shutdown = shutdown_tx.subscribe();
    handles.push(tokio::spawn(async move {
      preloader.run(preload_rx, preload_shutdown).await;
    }));
  }

  let refresh_shutdown = shutdown_tx.subscribe();
  handles.push(tokio::spawn(async move {
    refresher.run(refresh_shutdown).await;
  }));

  info!(tasks = handles.len(), "All tasks spawned - service is running");

  // ── 7. Wait for SIGINT ──────────────────────────────────
  signal::ctrl_c().await.context("Failed to listen for SIGINT")?;
  info!("SIGINT received, initiating graceful shutdown");
  let _ = shutdown_tx.send(());

  for handle in handles {
    let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
  }

  info!("Shutdown complete");
  Ok(())
}
