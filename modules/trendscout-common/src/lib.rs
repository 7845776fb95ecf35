pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::TrendScoutError;
pub use types::{
    IdeaEntry, NewTopic, Platform, ScoredTopic, SearchAnswer, SearchOutcome, SearchQuery,
    TopicFilter, TopicStats, TopicStatus, TopicUpdate, TrendingTopic,
};
