//! Portfolio Server - Snapshot, Probes and Metrics over HTTP
//!
//! Serves the current feed snapshot to the presentation layer plus the
//! operational endpoints:
//! - `/live`                - Liveness: 200 while the process runs
//! - `/ready`               - Readiness: 503 until the first snapshot
//! - `/portfolio`           - Full snapshot as JSON
//! - `/portfolio/:section`  - One section's items as JSON
//! - `/metrics`             - Prometheus text exposition

use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Json;
use tokio::sync::{broadcast, watch};
use tracing::{info, instrument};

use super::metrics::FeedMetrics;
use crate::domain::FeedSnapshot;

/// Shared state handed to every route.
#[derive(Clone)]
pub struct ServerState {
  /// Latest published snapshot.
  pub snapshots: watch::Receiver<Option<Arc<FeedSnapshot>>>,
  /// Metrics rendered on `/metrics`.
  pub metrics: Arc<FeedMetrics>,
}

impl ServerState {
  fn current(&self) -> Option<Arc<FeedSnapshot>> {
    self.snapshots.borrow().clone()
  }
}

/// Axum-based HTTP server for the portfolio feed.
pub struct PortfolioServer {
  state: ServerState,
  bind_address: String,
}

impl PortfolioServer {
  pub fn new(state: ServerState, bind_address: impl Into<String>) -> Self {
    Self {
      state,
      bind_address: bind_address.into(),
    }
  }

  /// All routes with state attached.
  pub fn router(state: ServerState) -> Router {
    Router::new()
      .route("/live", get(Self::liveness))
      .route("/ready", get(Self::readiness))
      .route("/portfolio", get(Self::portfolio))
      .route("/portfolio/:section", get(Self::section))
      .route("/metrics", get(Self::metrics))
      .with_state(state)
  }

  /// Bind and serve until the shutdown signal fires.
  #[instrument(skip(self, shutdown_rx), fields(address = %self.bind_address))]
  pub async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(&self.bind_address).await?;
    info!("Portfolio server started");

    axum::serve(listener, Self::router(self.state))
      .with_graceful_shutdown(async move {
        let _ = shutdown_rx.recv().await;
      })
      .await?;

    info!("Portfolio server stopped");
    Ok(())
  }

  async fn liveness() -> impl IntoResponse {
    (StatusCode::OK, "OK")
  }

  async fn readiness(State(state): State<ServerState>) -> impl IntoResponse {
    if state.current().is_some() {
      (StatusCode::OK, "READY")
    } else {
      (StatusCode::SERVICE_UNAVAILABLE, "NOT READY")
    }
  }

  async fn portfolio(State(state): State<ServerState>) -> Response {
    match state.current() {
      Some(snapshot) => Json(snapshot.as_ref()).into_response(),
      None => (StatusCode::SERVICE_UNAVAILABLE, "feed not loaded").into_response(),
    }
  }

  async fn section(State(state): State<ServerState>, Path(section): Path<String>) -> Response {
    let Some(snapshot) = state.current() else {
      return (StatusCode::SERVICE_UNAVAILABLE, "feed not loaded").into_response();
    };

    if snapshot.data.contains_section(&section) {
      Json(snapshot.data.section(&section)).into_response()
    } else {
      (StatusCode::NOT_FOUND, format!("unknown section: {section}")).into_response()
    }
  }

  async fn metrics(State(state): State<ServerState>) -> impl IntoResponse {
    (
      [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
      state.metrics.render(),
    )
  }
}
