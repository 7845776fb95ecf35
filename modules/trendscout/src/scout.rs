use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use uuid::Uuid;

use trendscout_common::config::DEFAULT_SEARCH_CONCURRENCY;
use trendscout_common::types::{NewTopic, Platform, SearchOutcome, SearchQuery, TrendingTopic};

use crate::aggregate;
use crate::queries;
use crate::search;
use crate::traits::{TopicScorer, TopicSink, TrendSearcher};

/// Summary of one trend-scout run.
#[derive(Debug)]
pub struct RunSummary {
    pub batch_id: String,
    pub queries_run: usize,
    pub queries_failed: usize,
    pub topics_found: usize,
    pub topics_saved: usize,
    pub topics: Vec<TrendingTopic>,
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Trend Scout Complete ===")?;
        writeln!(f, "Batch ID:       {}", self.batch_id)?;
        writeln!(
            f,
            "Searches:       {}/{} succeeded",
            self.queries_run - self.queries_failed,
            self.queries_run
        )?;
        writeln!(f, "Topics found:   {}", self.topics_found)?;
        writeln!(f, "Topics saved:   {}", self.topics_saved)?;
        for t in &self.topics {
            writeln!(
                f,
                "  [{}/10] {} ({})",
                t.relevance_score, t.topic, t.source_platform
            )?;
        }
        Ok(())
    }
}

pub struct TrendScout {
    searcher: Arc<dyn TrendSearcher>,
    scorer: Arc<dyn TopicScorer>,
    sink: Arc<dyn TopicSink>,
    concurrency: usize,
}

impl TrendScout {
    pub fn new(
        searcher: Arc<dyn TrendSearcher>,
        scorer: Arc<dyn TopicScorer>,
        sink: Arc<dyn TopicSink>,
    ) -> Self {
        Self {
            searcher,
            scorer,
            sink,
            concurrency: DEFAULT_SEARCH_CONCURRENCY,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Run the full pipeline: parallel searches, one scoring pass, persist.
    ///
    /// Phases are strictly sequential. Zero successful searches is a valid
    /// terminal state (zero topics, scorer never invoked), as is a scoring
    /// response that parses to nothing.
    pub async fn run(&self, custom_queries: Option<Vec<SearchQuery>>) -> Result<RunSummary> {
        let queries = custom_queries.unwrap_or_else(queries::default_queries);
        let batch_id = new_batch_id();

        // Phase 1: parallel searches
        info!(batch_id = batch_id.as_str(), queries = queries.len(), "Phase 1: running searches");
        let outcomes = search::run_searches(self.searcher.as_ref(), &queries, self.concurrency).await;

        let failed = outcomes.iter().filter(|o| !o.succeeded()).count();
        info!(
            succeeded = outcomes.len() - failed,
            failed,
            total = outcomes.len(),
            "Searches complete"
        );

        if failed == outcomes.len() {
            warn!(batch_id = batch_id.as_str(), "All searches failed, nothing to score");
            return Ok(RunSummary {
                batch_id,
                queries_run: outcomes.len(),
                queries_failed: failed,
                topics_found: 0,
                topics_saved: 0,
                topics: Vec::new(),
            });
        }

        // Phase 2: single scoring pass over the aggregated corpus
        info!("Phase 2: scoring and extracting topics");
        let corpus = aggregate::combine(&outcomes);
        let scored = self.scorer.score(&corpus).await?;
        info!(topics = scored.len(), "Topics extracted above relevance floor");

        // Phase 3: persist
        let topics_found = scored.len();
        let mut saved = Vec::with_capacity(topics_found);
        for topic in scored {
            let search_query = originating_query(&outcomes, &topic.source_platform);
            let new_topic = NewTopic::from_scored(topic, search_query, &batch_id);
            match self.sink.save_topic(new_topic).await {
                Ok(persisted) => saved.push(persisted),
                Err(e) => warn!(error = %e, "Failed to persist topic, skipping"),
            }
        }

        info!(
            batch_id = batch_id.as_str(),
            saved = saved.len(),
            "Topics saved"
        );

        Ok(RunSummary {
            batch_id,
            queries_run: outcomes.len(),
            queries_failed: failed,
            topics_found,
            topics_saved: saved.len(),
            topics: saved,
        })
    }
}

/// Short batch identifier shared by all topics a run persists.
fn new_batch_id() -> String {
    let mut id = Uuid::new_v4().to_string();
    id.truncate(8);
    id
}

/// First-match-wins attribution of a topic back to the query that likely
/// produced it. Lossy when multiple queries share a platform.
fn originating_query(outcomes: &[SearchOutcome], platform: &Platform) -> Option<String> {
    outcomes
        .iter()
        .find(|o| o.platform == *platform)
        .map(|o| o.query.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use trendscout_common::types::Platform;

    #[test]
    fn batch_ids_are_short_and_unique() {
        let a = new_batch_id();
        let b = new_batch_id();
        assert_eq!(a.len(), 8);
        assert_ne!(a, b);
    }

    #[test]
    fn originating_query_is_first_platform_match() {
        let q1 = SearchQuery::new("first reddit query", Platform::Reddit);
        let q2 = SearchQuery::new("second reddit query", Platform::Reddit);
        let outcomes = vec![
            SearchOutcome::failed(&q1, "down"),
            SearchOutcome::failed(&q2, "down"),
        ];
        // Errored outcomes still carry valid query text for attribution.
        assert_eq!(
            originating_query(&outcomes, &Platform::Reddit),
            Some("first reddit query".to_string())
        );
        assert_eq!(originating_query(&outcomes, &Platform::Web), None);
    }
}
