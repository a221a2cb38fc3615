//! README summarization backed by the OpenAI chat completions API

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::domain::summary::{ReadmeSummarizer, RepoSummary};
use crate::domain::DomainError;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Configuration for the OpenAI summarizer
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.0,
            timeout_secs: 60,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// OpenAI-backed summarizer producing a structured summary
pub struct OpenAiSummarizer {
    client: reqwest::Client,
    config: OpenAiConfig,
    auth_header: String,
}

impl Debug for OpenAiSummarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiSummarizer")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .field("api_key", &"[hidden]")
            .finish()
    }
}

impl OpenAiSummarizer {
    pub fn new(config: OpenAiConfig) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                DomainError::configuration(format!("Failed to build OpenAI client: {}", e))
            })?;

        let auth_header = format!("Bearer {}", config.api_key);

        Ok(Self {
            client,
            config,
            auth_header,
        })
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.config.base_url)
    }

    fn build_request(&self, readme: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.config.model,
            "temperature": self.config.temperature,
            "messages": [{
                "role": "user",
                "content": format!(
                    "Summarize the github repository from this README file content:\n\n{}",
                    readme
                ),
            }],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "repository_summary",
                    "strict": true,
                    "schema": {
                        "type": "object",
                        "properties": {
                            "summary": {
                                "type": "string",
                                "description": "A concise summary of the repository"
                            },
                            "cool_facts": {
                                "type": "array",
                                "items": { "type": "string" },
                                "description": "Interesting facts about the repository"
                            }
                        },
                        "required": ["summary", "cool_facts"],
                        "additionalProperties": false
                    }
                }
            }
        })
    }
}

#[async_trait]
impl ReadmeSummarizer for OpenAiSummarizer {
    async fn summarize(&self, readme: &str) -> Result<RepoSummary, DomainError> {
        debug!(model = %self.config.model, "Requesting README summary");

        let response = self
            .client
            .post(self.chat_completions_url())
            .header("Authorization", &self.auth_header)
            .json(&self.build_request(readme))
            .send()
            .await
            .map_err(|e| DomainError::provider("openai", format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(DomainError::provider(
                "openai",
                format!("OpenAI API returned {}", response.status().as_u16()),
            ));
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            DomainError::provider("openai", format!("Failed to parse response: {}", e))
        })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| DomainError::provider("openai", "No choices in response"))?;

        // The structured output arrives as a JSON string inside the message
        serde_json::from_str(&content).map_err(|e| {
            DomainError::provider("openai", format!("Malformed summary payload: {}", e))
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn summarizer_for(server: &MockServer) -> OpenAiSummarizer {
        let config = OpenAiConfig::new("test-api-key").with_base_url(server.uri());
        OpenAiSummarizer::new(config).unwrap()
    }

    fn completion_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-123",
            "model": "gpt-4o-mini",
            "choices": [{
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }]
        })
    }

    #[tokio::test]
    async fn test_summarize_parses_structured_output() {
        let server = MockServer::start().await;

        let content =
            r#"{"summary": "A test repo", "cool_facts": ["Written in Rust", "Has tests"]}"#;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer test-api-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4o-mini",
                "response_format": { "type": "json_schema" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(content)))
            .mount(&server)
            .await;

        let summarizer = summarizer_for(&server).await;
        let summary = summarizer.summarize("# Test Repo").await.unwrap();

        assert_eq!(summary.summary, "A test repo");
        assert_eq!(summary.cool_facts.len(), 2);
    }

    #[tokio::test]
    async fn test_summarize_upstream_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let summarizer = summarizer_for(&server).await;
        let err = summarizer.summarize("# Test Repo").await.unwrap_err();

        assert!(matches!(err, DomainError::Provider { .. }));
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn test_summarize_malformed_content() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(completion_body("not json at all")),
            )
            .mount(&server)
            .await;

        let summarizer = summarizer_for(&server).await;
        let err = summarizer.summarize("# Test Repo").await.unwrap_err();

        assert!(matches!(err, DomainError::Provider { .. }));
    }
}
