//! Use Cases Layer - Application Workflows
//!
//! Orchestrates domain mapping with port interfaces.
//!
//! Use cases:
//! - `PortfolioFeedLoader`: Fetch + map the CSV feed
//! - `FeedRefresher`: Periodic re-load with snapshot broadcast
//! - `MediaPreloader`: Bounded image decode fan-out

pub mod feed_loader;
pub mod preloader;
pub mod refresher;

pub use feed_loader::PortfolioFeedLoader;
pub use preloader::{MediaPreloader, PreloadReport};
pub use refresher::{FeedRefresher, SnapshotReceiver};
