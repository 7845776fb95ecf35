use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Platform
// ---------------------------------------------------------------------------

/// Source platform a search query targets (and a topic is attributed to).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Reddit,
    Twitter,
    Linkedin,
    Web,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Reddit => "reddit",
            Platform::Twitter => "twitter",
            Platform::Linkedin => "linkedin",
            Platform::Web => "web",
        }
    }

    /// Parse a platform tag from model output. Returns `None` for anything
    /// outside the four known tags; callers decide the fallback.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "reddit" => Some(Platform::Reddit),
            "twitter" | "x" => Some(Platform::Twitter),
            "linkedin" => Some(Platform::Linkedin),
            "web" => Some(Platform::Web),
            _ => None,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Search types
// ---------------------------------------------------------------------------

/// One search angle: query text plus the platform it targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    pub text: String,
    pub platform: Platform,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>, platform: Platform) -> Self {
        Self {
            text: text.into(),
            platform,
        }
    }
}

/// A successful answer from the search service.
#[derive(Debug, Clone, Default)]
pub struct SearchAnswer {
    pub content: String,
    pub citations: Vec<String>,
}

/// Per-query result of the search phase. Exactly one per input query.
/// `error.is_some()` means the query failed; content and citations are empty
/// and the outcome is skipped during aggregation but counted for reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub query: String,
    pub platform: Platform,
    pub content: String,
    pub citations: Vec<String>,
    pub error: Option<String>,
}

impl SearchOutcome {
    pub fn ok(query: &SearchQuery, answer: SearchAnswer) -> Self {
        Self {
            query: query.text.clone(),
            platform: query.platform,
            content: answer.content,
            citations: answer.citations,
            error: None,
        }
    }

    pub fn failed(query: &SearchQuery, error: impl std::fmt::Display) -> Self {
        Self {
            query: query.text.clone(),
            platform: query.platform,
            content: String::new(),
            citations: Vec::new(),
            error: Some(error.to_string()),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

// ---------------------------------------------------------------------------
// Topics
// ---------------------------------------------------------------------------

/// A topic as extracted and scored by the model, before persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredTopic {
    pub topic: String,
    pub summary: String,
    pub source_urls: Vec<String>,
    pub relevance_score: u8,
    pub content_angles: Vec<String>,
    pub source_platform: Platform,
}

/// What the pipeline hands to the sink: a scored topic plus run attribution.
#[derive(Debug, Clone)]
pub struct NewTopic {
    pub topic: String,
    pub summary: String,
    pub source_urls: Vec<String>,
    pub relevance_score: u8,
    pub content_angles: Vec<String>,
    pub search_query: Option<String>,
    pub batch_id: String,
    pub source_platform: Platform,
}

impl NewTopic {
    pub fn from_scored(scored: ScoredTopic, search_query: Option<String>, batch_id: &str) -> Self {
        Self {
            topic: scored.topic,
            summary: scored.summary,
            source_urls: scored.source_urls,
            relevance_score: scored.relevance_score,
            content_angles: scored.content_angles,
            search_query,
            batch_id: batch_id.to_string(),
            source_platform: scored.source_platform,
        }
    }
}

/// Review lifecycle of a persisted topic. The pipeline always creates topics
/// as `New`; the other states are set later from the review surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicStatus {
    New,
    Reviewed,
    Used,
    Dismissed,
}

impl TopicStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TopicStatus::New => "new",
            TopicStatus::Reviewed => "reviewed",
            TopicStatus::Used => "used",
            TopicStatus::Dismissed => "dismissed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "new" => Some(TopicStatus::New),
            "reviewed" => Some(TopicStatus::Reviewed),
            "used" => Some(TopicStatus::Used),
            "dismissed" => Some(TopicStatus::Dismissed),
            _ => None,
        }
    }
}

/// A persisted trending topic as returned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingTopic {
    pub id: Uuid,
    pub topic: String,
    pub summary: String,
    pub source_urls: Vec<String>,
    pub relevance_score: u8,
    pub content_angles: Vec<String>,
    pub search_query: Option<String>,
    pub batch_id: String,
    pub status: TopicStatus,
    pub source_platform: Platform,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Store query/update types
// ---------------------------------------------------------------------------

/// Filter for listing persisted topics. All fields optional; `None` matches everything.
#[derive(Debug, Clone, Default)]
pub struct TopicFilter {
    pub status: Option<TopicStatus>,
    pub platform: Option<Platform>,
    pub min_relevance: Option<u8>,
    pub batch_id: Option<String>,
}

/// Partial update applied during review. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct TopicUpdate {
    pub status: Option<TopicStatus>,
    pub notes: Option<String>,
    pub relevance_score: Option<u8>,
}

/// Aggregate stats over the topic store.
#[derive(Debug, Clone, Serialize)]
pub struct TopicStats {
    pub total: u64,
    pub new_count: u64,
    pub avg_relevance: f64,
    pub top_platform: Option<Platform>,
}

/// Idea-bank entry created when a trend is converted into a content idea.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdeaEntry {
    pub id: Uuid,
    pub idea: String,
    pub topic: String,
    pub angle: Option<String>,
    pub created_at: DateTime<Utc>,
}
