// Trait abstractions for the pipeline's three external boundaries.
//
// TrendSearcher — the answer-search service one query goes to.
// TopicScorer — the single-call scoring/deduplication model pass.
// TopicSink — persistence for scored topics (TopicStore adds review CRUD).
//
// These enable deterministic testing with the mocks in `testing`:
// no network, no database.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use trendscout_common::types::{
    IdeaEntry, NewTopic, ScoredTopic, SearchAnswer, TopicFilter, TopicStats, TopicUpdate,
    TrendingTopic,
};

// ---------------------------------------------------------------------------
// TrendSearcher
// ---------------------------------------------------------------------------

#[async_trait]
pub trait TrendSearcher: Send + Sync {
    /// Run one search query and return the textual answer plus citations.
    async fn search(&self, query: &str) -> Result<SearchAnswer>;
}

// ---------------------------------------------------------------------------
// TopicScorer
// ---------------------------------------------------------------------------

#[async_trait]
pub trait TopicScorer: Send + Sync {
    /// Score the aggregated corpus in a single model call. A malformed model
    /// response is an empty list, not an error; `Err` is reserved for the
    /// call itself failing.
    async fn score(&self, corpus: &str) -> Result<Vec<ScoredTopic>>;
}

// ---------------------------------------------------------------------------
// TopicSink / TopicStore
// ---------------------------------------------------------------------------

#[async_trait]
pub trait TopicSink: Send + Sync {
    /// Persist one scored topic. The sink fills in id, status=new, timestamps.
    async fn save_topic(&self, topic: NewTopic) -> Result<TrendingTopic>;
}

/// Full review surface over persisted topics. The pipeline itself only needs
/// `TopicSink`; the binary and the review tooling use the rest.
#[async_trait]
pub trait TopicStore: TopicSink {
    async fn get(&self, id: Uuid) -> Result<Option<TrendingTopic>>;

    /// List topics newest-first, narrowed by the filter.
    async fn list(&self, filter: &TopicFilter) -> Result<Vec<TrendingTopic>>;

    /// Apply a partial update. Returns `None` when the id does not exist.
    async fn update(&self, id: Uuid, update: TopicUpdate) -> Result<Option<TrendingTopic>>;

    /// Returns whether a row was actually deleted.
    async fn delete(&self, id: Uuid) -> Result<bool>;

    async fn stats(&self) -> Result<TopicStats>;

    /// Convert a trend into an idea-bank entry and mark the trend `used`.
    /// Returns `None` when the id does not exist.
    async fn convert_to_idea(&self, id: Uuid) -> Result<Option<IdeaEntry>>;
}
