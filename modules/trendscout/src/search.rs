use anyhow::Result;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use sonar_client::SonarClient;
use tracing::warn;

use trendscout_common::types::{SearchAnswer, SearchOutcome, SearchQuery};

use crate::queries::SEARCH_SYSTEM_PROMPT;
use crate::traits::TrendSearcher;

/// Run every query against the searcher, at most `concurrency` in flight.
///
/// Failure isolation is the contract here: a failed query becomes an
/// `error`-bearing outcome and its siblings keep running. Exactly one outcome
/// is returned per input query, in completion order.
pub async fn run_searches(
    searcher: &dyn TrendSearcher,
    queries: &[SearchQuery],
    concurrency: usize,
) -> Vec<SearchOutcome> {
    stream::iter(queries.iter().map(|query| async move {
        match searcher.search(&query.text).await {
            Ok(answer) => SearchOutcome::ok(query, answer),
            Err(e) => {
                warn!(
                    query = query.text.as_str(),
                    platform = %query.platform,
                    error = %e,
                    "Search failed"
                );
                SearchOutcome::failed(query, e)
            }
        }
    }))
    .buffer_unordered(concurrency.max(1))
    .collect()
    .await
}

#[async_trait]
impl TrendSearcher for SonarClient {
    async fn search(&self, query: &str) -> Result<SearchAnswer> {
        let answer = SonarClient::search(self, SEARCH_SYSTEM_PROMPT, query).await?;
        Ok(SearchAnswer {
            content: answer.content,
            citations: answer.citations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trendscout_common::types::Platform;

    use crate::testing::MockSearcher;

    #[tokio::test]
    async fn one_outcome_per_query_with_matching_tags() {
        let searcher = MockSearcher::new()
            .on_query("q1", "reddit chatter", vec!["https://reddit.com/r/x"])
            .on_query("q2", "linkedin chatter", vec![]);

        let queries = vec![
            SearchQuery::new("q1", Platform::Reddit),
            SearchQuery::new("q2", Platform::Linkedin),
        ];
        let outcomes = run_searches(&searcher, &queries, 3).await;

        assert_eq!(outcomes.len(), 2);
        let reddit = outcomes.iter().find(|o| o.query == "q1").unwrap();
        assert_eq!(reddit.platform, Platform::Reddit);
        assert_eq!(reddit.content, "reddit chatter");
        assert_eq!(reddit.citations, vec!["https://reddit.com/r/x"]);
        assert!(reddit.succeeded());
    }

    #[tokio::test]
    async fn failed_query_does_not_affect_siblings() {
        let searcher = MockSearcher::new()
            .on_query("good", "content", vec![])
            .failing("bad", "API timeout");

        let queries = vec![
            SearchQuery::new("good", Platform::Web),
            SearchQuery::new("bad", Platform::Reddit),
        ];
        let outcomes = run_searches(&searcher, &queries, 2).await;

        assert_eq!(outcomes.len(), 2);
        let good = outcomes.iter().find(|o| o.query == "good").unwrap();
        assert!(good.succeeded());
        let bad = outcomes.iter().find(|o| o.query == "bad").unwrap();
        assert!(bad.error.as_deref().unwrap().contains("API timeout"));
        assert!(bad.content.is_empty());
    }

    #[tokio::test]
    async fn concurrency_bound_of_zero_still_runs() {
        let searcher = MockSearcher::new().on_query("q", "c", vec![]);
        let queries = vec![SearchQuery::new("q", Platform::Web)];
        let outcomes = run_searches(&searcher, &queries, 0).await;
        assert_eq!(outcomes.len(), 1);
    }
}
