//! Review retrieval and sentiment aggregation.

pub mod aggregator;
pub mod app_id;
pub mod source;

pub use aggregator::{AggregatorConfig, ReviewAggregator};
pub use app_id::extract_app_id;
pub use source::SteamReviewSource;
