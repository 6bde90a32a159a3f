//! HTTP Adapters
//!
//! Outbound HTTP: the published CSV feed and image probing.
//!
//! Sub-modules:
//! - `client`: reqwest client with timeout and retries (`FeedSource`)
//! - `probe`: image fetch + decode (`MediaProbe`)

pub mod client;
pub mod probe;

pub use client::{FeedClient, FeedClientConfig};
pub use probe::HttpImageProbe;
