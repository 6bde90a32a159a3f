//! Metrics and Monitoring Adapters
//!
//! Prometheus metrics for feed loads and image preloading. Exposed
//! through the `/metrics` route of the portfolio server.

pub mod prometheus;

pub use prometheus::FeedMetrics;
