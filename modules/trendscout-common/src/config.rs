use std::env;

use tracing::info;

use crate::error::TrendScoutError;

/// Default audience profile used to score topic relevance.
pub const DEFAULT_ICP_PROFILE: &str = "B2B founders, coaches, and consultants \
who sell high-ticket services ($5k-$50k+). They care about scaling service \
businesses, personal branding, client acquisition, and practical AI adoption.";

/// How many searches run concurrently during the fan-out phase.
pub const DEFAULT_SEARCH_CONCURRENCY: usize = 3;

/// Minimum relevance score (1-10) a topic needs to be persisted.
pub const DEFAULT_RELEVANCE_FLOOR: u8 = 5;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // AI providers
    pub perplexity_api_key: String,
    pub anthropic_api_key: String,

    // Postgres
    pub database_url: String,

    // Pipeline tuning
    pub search_concurrency: usize,
    pub relevance_floor: u8,
    pub icp_profile: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Missing required variables are a configuration error, not a panic:
    /// the pipeline must refuse to start before any query executes.
    pub fn from_env() -> Result<Self, TrendScoutError> {
        Ok(Self {
            perplexity_api_key: required_env("PERPLEXITY_API_KEY")?,
            anthropic_api_key: required_env("ANTHROPIC_API_KEY")?,
            database_url: required_env("DATABASE_URL")?,
            search_concurrency: env::var("SEARCH_CONCURRENCY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SEARCH_CONCURRENCY),
            relevance_floor: env::var("RELEVANCE_FLOOR")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_RELEVANCE_FLOOR),
            icp_profile: env::var("ICP_PROFILE")
                .unwrap_or_else(|_| DEFAULT_ICP_PROFILE.to_string()),
        })
    }

    /// Log which credentials are present without leaking their values.
    pub fn log_redacted(&self) {
        info!(
            perplexity_key_set = !self.perplexity_api_key.is_empty(),
            anthropic_key_set = !self.anthropic_api_key.is_empty(),
            database_url_set = !self.database_url.is_empty(),
            search_concurrency = self.search_concurrency,
            relevance_floor = self.relevance_floor,
            "Config loaded"
        );
    }
}

fn required_env(key: &str) -> Result<String, TrendScoutError> {
    env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| TrendScoutError::Config(format!("{key} environment variable is required")))
}
