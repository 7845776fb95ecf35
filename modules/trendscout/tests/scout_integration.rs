//! End-to-end pipeline tests with mocked search, scoring, and storage.

use std::sync::Arc;

use trendscout::scout::TrendScout;
use trendscout::testing::{MemoryTopicStore, MockScorer, MockSearcher};
use trendscout_common::types::{Platform, ScoredTopic, SearchQuery, TopicStatus};

fn scored(topic: &str, platform: Platform, score: u8) -> ScoredTopic {
    ScoredTopic {
        topic: topic.to_string(),
        summary: format!("{topic} is trending"),
        source_urls: vec!["https://example.com/1".to_string()],
        relevance_score: score,
        content_angles: vec!["Share a client story".to_string()],
        source_platform: platform,
    }
}

fn five_queries() -> Vec<SearchQuery> {
    vec![
        SearchQuery::new("reddit pain points", Platform::Reddit),
        SearchQuery::new("linkedin scaling talk", Platform::Linkedin),
        SearchQuery::new("ai hot takes", Platform::Twitter),
        SearchQuery::new("reddit founder debates", Platform::Reddit),
        SearchQuery::new("branding trends", Platform::Web),
    ]
}

#[tokio::test]
async fn partial_search_failures_still_produce_a_batch() {
    let searcher = Arc::new(
        MockSearcher::new()
            .on_query("reddit pain points", "founders debate pricing", vec![])
            .on_query("linkedin scaling talk", "everyone posts carousels", vec![])
            .on_query("branding trends", "authenticity wins", vec![])
            .failing("ai hot takes", "rate limited")
            .failing("reddit founder debates", "timeout"),
    );
    let scorer = Arc::new(MockScorer::new().returning(vec![
        scored("AI pricing backlash", Platform::Reddit, 9),
        scored("Carousel fatigue", Platform::Linkedin, 6),
    ]));
    let store = Arc::new(MemoryTopicStore::new());

    let scout = TrendScout::new(searcher.clone(), scorer.clone(), store.clone());
    let summary = scout.run(Some(five_queries())).await.unwrap();

    assert_eq!(summary.queries_run, 5);
    assert_eq!(summary.queries_failed, 2);
    assert_eq!(summary.topics_found, 2);
    assert_eq!(summary.topics_saved, 2);
    assert_eq!(searcher.call_count(), 5);
    assert_eq!(scorer.call_count(), 1);

    // Every persisted topic carries the run's batch id.
    assert_eq!(summary.batch_id.len(), 8);
    for topic in &summary.topics {
        assert_eq!(topic.batch_id, summary.batch_id);
        assert_eq!(topic.status, TopicStatus::New);
    }

    // Attribution points at the first query for the topic's platform.
    let reddit = summary
        .topics
        .iter()
        .find(|t| t.source_platform == Platform::Reddit)
        .unwrap();
    assert_eq!(reddit.search_query.as_deref(), Some("reddit pain points"));
}

#[tokio::test]
async fn all_searches_failing_skips_scoring_entirely() {
    let searcher = Arc::new(
        MockSearcher::new()
            .failing("q1", "down")
            .failing("q2", "down"),
    );
    let scorer = Arc::new(MockScorer::new().returning(vec![scored("x", Platform::Web, 9)]));
    let store = Arc::new(MemoryTopicStore::new());

    let scout = TrendScout::new(searcher, scorer.clone(), store.clone());
    let queries = vec![
        SearchQuery::new("q1", Platform::Reddit),
        SearchQuery::new("q2", Platform::Web),
    ];
    let summary = scout.run(Some(queries)).await.unwrap();

    assert_eq!(summary.queries_failed, 2);
    assert_eq!(summary.topics_found, 0);
    assert_eq!(summary.topics_saved, 0);
    assert!(summary.topics.is_empty());
    assert!(!summary.batch_id.is_empty());
    // The scorer must never run on an empty corpus.
    assert_eq!(scorer.call_count(), 0);
    assert_eq!(store.saved_count(), 0);
}

#[tokio::test]
async fn corpus_contains_only_successful_outcomes() {
    let searcher = Arc::new(
        MockSearcher::new()
            .on_query("good", "useful signal", vec!["https://a.example"])
            .failing("bad", "boom"),
    );
    let scorer = Arc::new(MockScorer::new());
    let store = Arc::new(MemoryTopicStore::new());

    let scout = TrendScout::new(searcher, scorer.clone(), store);
    let queries = vec![
        SearchQuery::new("good", Platform::Web),
        SearchQuery::new("bad", Platform::Reddit),
    ];
    scout.run(Some(queries)).await.unwrap();

    let corpora = scorer.corpora();
    assert_eq!(corpora.len(), 1);
    assert!(corpora[0].contains("useful signal"));
    assert!(corpora[0].contains("https://a.example"));
    assert!(!corpora[0].contains("boom"));
}

#[tokio::test]
async fn failing_save_skips_that_topic_only() {
    let searcher = Arc::new(MockSearcher::new().on_query("q", "content", vec![]));
    let scorer = Arc::new(MockScorer::new().returning(vec![
        scored("keeps", Platform::Web, 8),
        scored("breaks", Platform::Web, 7),
    ]));
    let store = Arc::new(MemoryTopicStore::new().failing_saves_for("breaks"));

    let scout = TrendScout::new(searcher, scorer, store.clone());
    let summary = scout
        .run(Some(vec![SearchQuery::new("q", Platform::Web)]))
        .await
        .unwrap();

    assert_eq!(summary.topics_found, 2);
    assert_eq!(summary.topics_saved, 1);
    assert_eq!(summary.topics[0].topic, "keeps");
    assert_eq!(store.saved_count(), 1);
}

#[tokio::test]
async fn scorer_failure_aborts_the_run() {
    let searcher = Arc::new(MockSearcher::new().on_query("q", "content", vec![]));
    let scorer = Arc::new(MockScorer::new().failing("model unavailable"));
    let store = Arc::new(MemoryTopicStore::new());

    let scout = TrendScout::new(searcher, scorer, store.clone());
    let result = scout
        .run(Some(vec![SearchQuery::new("q", Platform::Web)]))
        .await;

    assert!(result.is_err());
    assert_eq!(store.saved_count(), 0);
}

#[tokio::test]
async fn custom_queries_replace_the_defaults() {
    let searcher = Arc::new(MockSearcher::new().on_query("only this one", "content", vec![]));
    let scorer = Arc::new(MockScorer::new());
    let store = Arc::new(MemoryTopicStore::new());

    let scout = TrendScout::new(searcher.clone(), scorer, store);
    let summary = scout
        .run(Some(vec![SearchQuery::new("only this one", Platform::Web)]))
        .await
        .unwrap();

    // One scripted query, one call: the defaults never ran (the mock errors
    // on anything unscripted, which would have shown up as failures).
    assert_eq!(summary.queries_run, 1);
    assert_eq!(summary.queries_failed, 0);
    assert_eq!(searcher.call_count(), 1);
}

#[tokio::test]
async fn review_lifecycle_over_persisted_topics() {
    let searcher = Arc::new(MockSearcher::new().on_query("q", "content", vec![]));
    let scorer = Arc::new(MockScorer::new().returning(vec![
        scored("trend a", Platform::Reddit, 9),
        scored("trend b", Platform::Linkedin, 6),
    ]));
    let store = Arc::new(MemoryTopicStore::new());

    let scout = TrendScout::new(searcher, scorer, store.clone());
    let summary = scout
        .run(Some(vec![SearchQuery::new("q", Platform::Reddit)]))
        .await
        .unwrap();

    use trendscout::traits::TopicStore;
    use trendscout_common::types::{TopicFilter, TopicUpdate};

    // Filter by the batch the run produced.
    let batch = store
        .list(&TopicFilter {
            batch_id: Some(summary.batch_id.clone()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(batch.len(), 2);

    // Review one topic.
    let id = batch[0].id;
    let updated = store
        .update(
            id,
            TopicUpdate {
                status: Some(TopicStatus::Reviewed),
                notes: Some("worth a post".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, TopicStatus::Reviewed);
    assert_eq!(updated.notes.as_deref(), Some("worth a post"));

    // Convert the other into an idea; it flips to used.
    let other = batch[1].id;
    let idea = store.convert_to_idea(other).await.unwrap().unwrap();
    assert!(idea.topic.starts_with("Trending: "));
    let converted = store.get(other).await.unwrap().unwrap();
    assert_eq!(converted.status, TopicStatus::Used);

    // Stats reflect the lifecycle.
    let stats = store.stats().await.unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.new_count, 0);
    assert!(stats.avg_relevance > 5.0);
}
