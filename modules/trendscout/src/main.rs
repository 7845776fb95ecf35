use std::sync::Arc;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sonar_client::SonarClient;
use trendscout::scorer::ClaudeScorer;
use trendscout::scout::TrendScout;
use trendscout::store::PgTopicStore;
use trendscout_common::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("trendscout=info".parse()?))
        .init();

    info!("Trend Scout starting...");

    // Load config — a missing key aborts here, before any query runs
    let config = Config::from_env()?;
    config.log_redacted();

    // Connect to Postgres and ensure the schema exists
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let store = PgTopicStore::new(pool);
    store.migrate().await?;

    let searcher = Arc::new(SonarClient::new(&config.perplexity_api_key));
    let scorer = Arc::new(ClaudeScorer::new(
        &config.anthropic_api_key,
        &config.icp_profile,
        config.relevance_floor,
    ));

    let scout = TrendScout::new(searcher, scorer, Arc::new(store))
        .with_concurrency(config.search_concurrency);

    let summary = scout.run(None).await?;
    println!("{summary}");

    Ok(())
}
