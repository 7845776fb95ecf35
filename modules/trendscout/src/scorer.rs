use anyhow::Result;
use async_trait::async_trait;
use claude_client::{strip_code_blocks, Claude};
use serde::Deserialize;
use tracing::{info, warn};

use trendscout_common::types::{Platform, ScoredTopic};

use crate::traits::TopicScorer;

const SCORING_MODEL: &str = "claude-sonnet-4-20250514";

/// What the model returns per topic. Platform arrives as a free string and is
/// mapped onto the enum afterwards so one odd tag cannot sink the whole batch.
#[derive(Debug, Clone, Deserialize)]
struct RawTopic {
    topic: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    source_urls: Vec<String>,
    #[serde(default)]
    relevance_score: u8,
    #[serde(default)]
    content_angles: Vec<String>,
    #[serde(default)]
    source_platform: String,
}

pub struct ClaudeScorer {
    claude: Claude,
    icp_profile: String,
    relevance_floor: u8,
}

impl ClaudeScorer {
    pub fn new(anthropic_api_key: &str, icp_profile: &str, relevance_floor: u8) -> Self {
        Self {
            claude: Claude::new(anthropic_api_key, SCORING_MODEL),
            icp_profile: icp_profile.to_string(),
            relevance_floor,
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, url: &str) -> Self {
        self.claude = self.claude.with_base_url(url);
        self
    }

    fn build_prompt(&self, corpus: &str) -> String {
        format!(
            r#"Analyze these search results and extract distinct trending topics relevant to our ICP: {icp}

SEARCH RESULTS:
{corpus}

For each unique topic, provide:
1. topic: A concise topic title (max 10 words)
2. summary: 2-3 sentence summary of why this is trending
3. source_urls: Any relevant URLs from the citations
4. relevance_score: 1-10 score for ICP relevance (10 = perfectly relevant)
5. content_angles: 2-3 specific content angles (e.g., "Share your contrarian take on X", "Story about how you solved Y for a client")
6. source_platform: Primary platform where this was found (reddit/twitter/linkedin/web)

Rules:
- Deduplicate similar topics
- Filter OUT anything below {floor}/10 relevance
- Focus on topics that would make good LinkedIn content
- Prefer specific, timely topics over generic evergreen advice

Return as JSON array:
[{{"topic": "...", "summary": "...", "source_urls": [...], "relevance_score": N, "content_angles": [...], "source_platform": "..."}}]

Return ONLY the JSON array, no other text."#,
            icp = self.icp_profile,
            floor = self.relevance_floor,
        )
    }
}

#[async_trait]
impl TopicScorer for ClaudeScorer {
    async fn score(&self, corpus: &str) -> Result<Vec<ScoredTopic>> {
        let prompt = self.build_prompt(corpus);
        let response = self.claude.complete(prompt).await?;
        Ok(parse_topics(&response, self.relevance_floor))
    }
}

/// Parse the model's response into scored topics.
///
/// Lenient by contract: invalid JSON or a non-array document is an empty
/// list, never an error. Topics under the relevance floor are dropped here
/// as well, so the floor invariant holds even when the model ignores its
/// instructions; the dropped count is logged for auditability.
pub fn parse_topics(response: &str, relevance_floor: u8) -> Vec<ScoredTopic> {
    let text = strip_code_blocks(response);

    let raw: Vec<RawTopic> = match serde_json::from_str(text) {
        Ok(topics) => topics,
        Err(e) => {
            warn!(error = %e, "Failed to parse scoring response as a JSON array");
            return Vec::new();
        }
    };

    let parsed = raw.len();
    let topics: Vec<ScoredTopic> = raw
        .into_iter()
        .filter(|t| t.relevance_score >= relevance_floor)
        .map(|t| {
            let source_platform = Platform::parse(&t.source_platform).unwrap_or_else(|| {
                warn!(
                    platform = t.source_platform.as_str(),
                    topic = t.topic.as_str(),
                    "Unknown source platform, defaulting to web"
                );
                Platform::Web
            });
            ScoredTopic {
                topic: t.topic,
                summary: t.summary,
                source_urls: t.source_urls,
                relevance_score: t.relevance_score,
                content_angles: t.content_angles,
                source_platform,
            }
        })
        .collect();

    let dropped = parsed - topics.len();
    if dropped > 0 {
        info!(
            parsed,
            dropped, relevance_floor, "Dropped topics below relevance floor"
        );
    }
    topics
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_markdown_fences_before_parsing() {
        let response = "```json\n[{\"topic\":\"T\",\"summary\":\"S\",\"source_urls\":[],\"relevance_score\":7,\"content_angles\":[\"A\"],\"source_platform\":\"web\"}]\n```";
        let topics = parse_topics(response, 5);
        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].topic, "T");
        assert_eq!(topics[0].relevance_score, 7);
        assert_eq!(topics[0].source_platform, Platform::Web);
    }

    #[test]
    fn invalid_json_is_zero_topics() {
        assert!(parse_topics("not valid json", 5).is_empty());
    }

    #[test]
    fn non_array_json_is_zero_topics() {
        assert!(parse_topics(r#"{"topic": "an object, not an array"}"#, 5).is_empty());
    }

    #[test]
    fn topics_below_floor_are_dropped() {
        let response = r#"[
            {"topic":"keep","summary":"","source_urls":[],"relevance_score":6,"content_angles":[],"source_platform":"reddit"},
            {"topic":"drop","summary":"","source_urls":[],"relevance_score":4,"content_angles":[],"source_platform":"reddit"}
        ]"#;
        let topics = parse_topics(response, 5);
        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].topic, "keep");
    }

    #[test]
    fn unknown_platform_falls_back_to_web() {
        let response = r#"[{"topic":"T","summary":"","source_urls":[],"relevance_score":8,"content_angles":[],"source_platform":"mastodon"}]"#;
        let topics = parse_topics(response, 5);
        assert_eq!(topics[0].source_platform, Platform::Web);
    }

    #[test]
    fn prompt_carries_profile_and_floor() {
        let scorer = ClaudeScorer::new("sk-test", "B2B founders", 5);
        let prompt = scorer.build_prompt("corpus text");
        assert!(prompt.contains("B2B founders"));
        assert!(prompt.contains("below 5/10"));
        assert!(prompt.contains("corpus text"));
    }

    #[tokio::test]
    async fn unreachable_model_endpoint_is_an_error_not_empty() {
        // Distinguishes transport failure (Err) from malformed content (Ok empty).
        let scorer = ClaudeScorer::new("sk-test", "profile", 5).with_base_url("http://127.0.0.1:9");
        assert!(scorer.score("corpus").await.is_err());
    }
}
