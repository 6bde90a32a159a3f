//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies (HTTP client, image decoding, HTTP server,
//! Prometheus). Each sub-module groups adapters by infrastructure concern.
//!
//! Adapter categories:
//! - `http`: Feed retrieval and image probing via reqwest
//! - `metrics`: Prometheus metrics registry
//! - `server`: Portfolio JSON, health probes and metrics via axum

pub mod http;
pub mod metrics;
pub mod server;
