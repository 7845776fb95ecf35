//! Deterministic test doubles for the pipeline's external boundaries.
//!
//! Available to downstream crates behind the `test-support` feature so
//! integration tests can run the full pipeline with no network or database.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use trendscout_common::types::{
    IdeaEntry, NewTopic, ScoredTopic, SearchAnswer, TopicFilter, TopicStats, TopicStatus,
    TopicUpdate, TrendingTopic,
};

use crate::traits::{TopicScorer, TopicSink, TopicStore, TrendSearcher};

// ---------------------------------------------------------------------------
// MockSearcher
// ---------------------------------------------------------------------------

/// Scripted searcher: answers and failures are registered per query text.
/// An unregistered query is an error, so tests notice unexpected calls.
#[derive(Default)]
pub struct MockSearcher {
    answers: HashMap<String, SearchAnswer>,
    failures: HashMap<String, String>,
    calls: AtomicUsize,
}

impl MockSearcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_query(
        mut self,
        query: impl Into<String>,
        content: impl Into<String>,
        citations: Vec<&str>,
    ) -> Self {
        self.answers.insert(
            query.into(),
            SearchAnswer {
                content: content.into(),
                citations: citations.into_iter().map(String::from).collect(),
            },
        );
        self
    }

    pub fn failing(mut self, query: impl Into<String>, error: impl Into<String>) -> Self {
        self.failures.insert(query.into(), error.into());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TrendSearcher for MockSearcher {
    async fn search(&self, query: &str) -> Result<SearchAnswer> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.failures.get(query) {
            return Err(anyhow!("{error}"));
        }
        self.answers
            .get(query)
            .cloned()
            .ok_or_else(|| anyhow!("no scripted answer for query: {query}"))
    }
}

// ---------------------------------------------------------------------------
// MockScorer
// ---------------------------------------------------------------------------

/// Returns a fixed topic list and counts invocations, so tests can assert
/// the scorer was (or was not) reached.
#[derive(Default)]
pub struct MockScorer {
    topics: Vec<ScoredTopic>,
    fail_with: Option<String>,
    calls: AtomicUsize,
    corpora: Mutex<Vec<String>>,
}

impl MockScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn returning(mut self, topics: Vec<ScoredTopic>) -> Self {
        self.topics = topics;
        self
    }

    pub fn failing(mut self, error: impl Into<String>) -> Self {
        self.fail_with = Some(error.into());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The corpus text passed to each call, in call order.
    pub fn corpora(&self) -> Vec<String> {
        self.corpora.lock().unwrap().clone()
    }
}

#[async_trait]
impl TopicScorer for MockScorer {
    async fn score(&self, corpus: &str) -> Result<Vec<ScoredTopic>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.corpora.lock().unwrap().push(corpus.to_string());
        if let Some(error) = &self.fail_with {
            return Err(anyhow!("{error}"));
        }
        Ok(self.topics.clone())
    }
}

// ---------------------------------------------------------------------------
// MemoryTopicStore
// ---------------------------------------------------------------------------

/// In-memory `TopicStore` with the same observable behavior as the Postgres
/// store: newest-first listing, partial updates, idea conversion.
#[derive(Default)]
pub struct MemoryTopicStore {
    topics: Mutex<Vec<TrendingTopic>>,
    ideas: Mutex<Vec<IdeaEntry>>,
    fail_saves_for: Mutex<Vec<String>>,
}

impl MemoryTopicStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `save_topic` fail for topics with the given title.
    pub fn failing_saves_for(self, topic_title: impl Into<String>) -> Self {
        self.fail_saves_for.lock().unwrap().push(topic_title.into());
        self
    }

    pub fn saved_count(&self) -> usize {
        self.topics.lock().unwrap().len()
    }

    pub fn saved_topics(&self) -> Vec<TrendingTopic> {
        self.topics.lock().unwrap().clone()
    }

    pub fn ideas(&self) -> Vec<IdeaEntry> {
        self.ideas.lock().unwrap().clone()
    }
}

#[async_trait]
impl TopicSink for MemoryTopicStore {
    async fn save_topic(&self, topic: NewTopic) -> Result<TrendingTopic> {
        if self.fail_saves_for.lock().unwrap().contains(&topic.topic) {
            return Err(anyhow!("simulated save failure for: {}", topic.topic));
        }
        let now = Utc::now();
        let persisted = TrendingTopic {
            id: Uuid::new_v4(),
            topic: topic.topic,
            summary: topic.summary,
            source_urls: topic.source_urls,
            relevance_score: topic.relevance_score,
            content_angles: topic.content_angles,
            search_query: topic.search_query,
            batch_id: topic.batch_id,
            status: TopicStatus::New,
            source_platform: topic.source_platform,
            notes: None,
            created_at: now,
            updated_at: now,
        };
        self.topics.lock().unwrap().push(persisted.clone());
        Ok(persisted)
    }
}

#[async_trait]
impl TopicStore for MemoryTopicStore {
    async fn get(&self, id: Uuid) -> Result<Option<TrendingTopic>> {
        Ok(self
            .topics
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned())
    }

    async fn list(&self, filter: &TopicFilter) -> Result<Vec<TrendingTopic>> {
        let topics = self.topics.lock().unwrap();
        let mut matched: Vec<TrendingTopic> = topics
            .iter()
            .filter(|t| filter.status.is_none_or(|s| t.status == s))
            .filter(|t| filter.platform.is_none_or(|p| t.source_platform == p))
            .filter(|t| filter.min_relevance.is_none_or(|m| t.relevance_score >= m))
            .filter(|t| {
                filter
                    .batch_id
                    .as_deref()
                    .is_none_or(|b| t.batch_id == b)
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matched)
    }

    async fn update(&self, id: Uuid, update: TopicUpdate) -> Result<Option<TrendingTopic>> {
        let mut topics = self.topics.lock().unwrap();
        let Some(topic) = topics.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        if let Some(status) = update.status {
            topic.status = status;
        }
        if let Some(notes) = update.notes {
            topic.notes = Some(notes);
        }
        if let Some(score) = update.relevance_score {
            topic.relevance_score = score;
        }
        topic.updated_at = Utc::now();
        Ok(Some(topic.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut topics = self.topics.lock().unwrap();
        let before = topics.len();
        topics.retain(|t| t.id != id);
        Ok(topics.len() < before)
    }

    async fn stats(&self) -> Result<TopicStats> {
        let topics = self.topics.lock().unwrap();
        let total = topics.len() as u64;
        let new_count = topics
            .iter()
            .filter(|t| t.status == TopicStatus::New)
            .count() as u64;
        let avg_relevance = if topics.is_empty() {
            0.0
        } else {
            topics.iter().map(|t| t.relevance_score as f64).sum::<f64>() / topics.len() as f64
        };
        let mut by_platform = HashMap::new();
        for t in topics.iter() {
            *by_platform.entry(t.source_platform).or_insert(0usize) += 1;
        }
        let top_platform = by_platform
            .into_iter()
            .max_by_key(|(_, count)| *count)
            .map(|(platform, _)| platform);
        Ok(TopicStats {
            total,
            new_count,
            avg_relevance,
            top_platform,
        })
    }

    async fn convert_to_idea(&self, id: Uuid) -> Result<Option<IdeaEntry>> {
        let mut topics = self.topics.lock().unwrap();
        let Some(topic) = topics.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        let idea = IdeaEntry {
            id: Uuid::new_v4(),
            idea: topic.topic.clone(),
            topic: format!("Trending: {}", topic.source_platform),
            angle: topic.content_angles.first().cloned(),
            created_at: Utc::now(),
        };
        topic.status = TopicStatus::Used;
        topic.updated_at = Utc::now();
        self.ideas.lock().unwrap().push(idea.clone());
        Ok(Some(idea))
    }
}
