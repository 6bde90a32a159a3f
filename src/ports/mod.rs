//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the usecases layer requires
//! from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `FeedSource`: Published CSV feed retrieval
//! - `MediaProbe`: Image fetch + decode for preloading
//! - `FeedMetricsSink`: Load and preload outcome recording

pub mod feed_source;
pub mod media_probe;
pub mod metrics_sink;

pub use feed_source::FeedSource;
pub use media_probe::{MediaDimensions, MediaProbe};
pub use metrics_sink::FeedMetricsSink;
