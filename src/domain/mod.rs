//! Domain layer - Feed content model and mapping rules.
//!
//! Pure transformation from published CSV text to the section-keyed
//! portfolio collection. No I/O here (hexagonal architecture inner
//! ring): fetching lives behind `crate::ports::FeedSource`.

pub mod delivery;
pub mod error;
pub mod item;
pub mod media;
pub mod parser;
pub mod portfolio;

// Re-export core types for convenience
pub use delivery::{DeliveryOptions, optimize_url};
pub use error::{FeedError, FeedResult};
pub use item::{DEFAULT_SECTION, EquipmentSpec, Layout, MediaType, MemberBio, ProjectItem};
pub use media::detect_media_type;
pub use parser::parse_feed;
pub use portfolio::{FeedSnapshot, PortfolioData};
