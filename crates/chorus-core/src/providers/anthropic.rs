//! Anthropic Claude provider

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

use super::types::{ProviderConfig, ProviderId, TextProvider};

/// The Messages API requires max_tokens; used when none is configured.
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Anthropic Messages API client
pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    config: ProviderConfig,
}

impl std::fmt::Debug for AnthropicProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicProvider")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .finish()
    }
}

impl AnthropicProvider {
    pub fn new(api_key: String, config: ProviderConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key,
            config,
        }
    }

    /// Build the Messages API request body for a single user prompt.
    fn request_body(&self, prompt: &str) -> Value {
        let mut body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            "messages": [{"role": "user", "content": prompt}],
        });
        if let Some(temperature) = self.config.temperature {
            body["temperature"] = json!(temperature);
        }
        body
    }

    /// Extract the first text content block.
    fn extract_text(resp: AnthropicApiResponse) -> Result<String> {
        resp.content
            .into_iter()
            .find_map(|block| match block {
                AnthropicBlock::Text { text } => Some(text),
                AnthropicBlock::Other => None,
            })
            .ok_or_else(|| anyhow!("Anthropic response had no text content"))
    }
}

#[async_trait]
impl TextProvider for AnthropicProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Anthropic
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/v1/messages", self.config.base_url);
        let body = self.request_body(prompt);

        debug!("Anthropic request: model={}", self.config.model);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .context("Failed to send request to Anthropic API")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow!(
                "Anthropic API request failed with status {}: {}",
                status,
                error_text
            ));
        }

        let api_response: AnthropicApiResponse = response
            .json()
            .await
            .context("Failed to parse Anthropic API response")?;

        debug!(
            "Anthropic response: blocks={}, stop_reason={:?}",
            api_response.content.len(),
            api_response.stop_reason
        );

        Self::extract_text(api_response)
    }
}

// ── Anthropic wire types ──

#[derive(Debug, Clone, Deserialize)]
struct AnthropicApiResponse {
    content: Vec<AnthropicBlock>,
    stop_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum AnthropicBlock {
    Text { text: String },
    #[serde(other)]
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(config: ProviderConfig) -> AnthropicProvider {
        AnthropicProvider::new("sk-ant-test".to_string(), config)
    }

    #[test]
    fn test_request_body_defaults_max_tokens() {
        let p = provider(ProviderConfig::defaults(ProviderId::Anthropic));
        let body = p.request_body("hello");
        assert_eq!(body["max_tokens"], DEFAULT_MAX_TOKENS);
        assert_eq!(body["messages"][0]["content"], "hello");
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn test_request_body_with_params() {
        let mut config = ProviderConfig::defaults(ProviderId::Anthropic);
        config.max_tokens = Some(2048);
        config.temperature = Some(0.7);
        let body = provider(config).request_body("hi");
        assert_eq!(body["max_tokens"], 2048);
        assert!(body.get("temperature").is_some());
    }

    #[test]
    fn test_extract_text() {
        let resp = AnthropicApiResponse {
            content: vec![AnthropicBlock::Text {
                text: "Hello!".to_string(),
            }],
            stop_reason: Some("end_turn".to_string()),
        };
        assert_eq!(AnthropicProvider::extract_text(resp).unwrap(), "Hello!");
    }

    #[test]
    fn test_extract_text_skips_non_text() {
        let resp = AnthropicApiResponse {
            content: vec![
                AnthropicBlock::Other,
                AnthropicBlock::Text {
                    text: "after".to_string(),
                },
            ],
            stop_reason: None,
        };
        assert_eq!(AnthropicProvider::extract_text(resp).unwrap(), "after");
    }

    #[test]
    fn test_extract_text_empty() {
        let resp = AnthropicApiResponse {
            content: vec![],
            stop_reason: None,
        };
        assert!(AnthropicProvider::extract_text(resp).is_err());
    }

    #[test]
    fn test_block_deserialization() {
        let block: AnthropicBlock =
            serde_json::from_str(r#"{"type":"text","text":"hi"}"#).unwrap();
        assert!(matches!(block, AnthropicBlock::Text { text } if text == "hi"));
        let other: AnthropicBlock =
            serde_json::from_str(r#"{"type":"tool_use","id":"x"}"#).unwrap();
        assert!(matches!(other, AnthropicBlock::Other));
    }

    #[test]
    fn test_debug_hides_key() {
        let p = provider(ProviderConfig::defaults(ProviderId::Anthropic));
        let debug = format!("{:?}", p);
        assert!(!debug.contains("sk-ant-test"));
    }
}
