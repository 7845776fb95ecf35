pub mod error;

pub use error::{Result, SonarError};

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

const SONAR_BASE_URL: &str = "https://api.perplexity.ai";
const SONAR_MODEL: &str = "sonar";

/// A completed Sonar search: the textual answer plus its citation URLs.
#[derive(Debug, Clone, Default)]
pub struct SonarAnswer {
    pub content: String,
    pub citations: Vec<String>,
}

pub struct SonarClient {
    api_key: String,
    client: reqwest::Client,
    base_url: String,
}

impl SonarClient {
    pub fn new(api_key: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            api_key: api_key.to_string(),
            client,
            base_url: SONAR_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Run one search: a system instruction plus the query as the user turn.
    ///
    /// An empty API key fails before any request is built.
    pub async fn search(&self, system: &str, query: &str) -> Result<SonarAnswer> {
        if self.api_key.is_empty() {
            return Err(SonarError::MissingApiKey);
        }

        let request = ChatRequest {
            model: SONAR_MODEL.to_string(),
            messages: vec![
                WireMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                WireMessage {
                    role: "user".to_string(),
                    content: query.to_string(),
                },
            ],
        };

        debug!(model = SONAR_MODEL, "Sonar search request");

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(SonarError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let data: ChatResponse = resp.json().await?;
        let content = data
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| SonarError::Malformed("response has no choices".to_string()))?;

        Ok(SonarAnswer {
            content,
            citations: data.citations,
        })
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    citations: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_api_key_fails_before_any_request() {
        // base_url points at a closed port: if the client attempted a request
        // the error would be Network, not MissingApiKey.
        let client = SonarClient::new("").with_base_url("http://127.0.0.1:9");
        let err = client.search("system", "query").await.unwrap_err();
        assert!(matches!(err, SonarError::MissingApiKey));
    }

    #[test]
    fn response_parses_citations() {
        let json = r#"{
            "choices": [{"message": {"content": "AI outreach is trending..."}}],
            "citations": ["https://example.com/article"]
        }"#;
        let resp: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.choices[0].message.content, "AI outreach is trending...");
        assert_eq!(resp.citations, vec!["https://example.com/article"]);
    }

    #[test]
    fn response_without_citations_defaults_empty() {
        let json = r#"{"choices": [{"message": {"content": "answer"}}]}"#;
        let resp: ChatResponse = serde_json::from_str(json).unwrap();
        assert!(resp.citations.is_empty());
    }
}
