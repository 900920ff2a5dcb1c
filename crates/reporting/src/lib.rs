pub mod stats;

pub use stats::{CampaignAggregator, CampaignStats};
