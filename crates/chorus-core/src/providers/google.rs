//! Google Gemini provider

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

use super::types::{ProviderConfig, ProviderId, TextProvider};

/// Google Gemini generateContent client
pub struct GoogleProvider {
    client: Client,
    api_key: String,
    config: ProviderConfig,
}

impl std::fmt::Debug for GoogleProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleProvider")
            .field("model", &self.config.model)
            .finish()
    }
}

impl GoogleProvider {
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

    /// Endpoint path without the key query parameter.
    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }

    /// Build the generateContent request body for a single user prompt.
    fn request_body(&self, prompt: &str) -> Value {
        let mut generation_config = json!({});
        if let Some(max_tokens) = self.config.max_tokens {
            generation_config["maxOutputTokens"] = json!(max_tokens);
        }
        if let Some(temperature) = self.config.temperature {
            generation_config["temperature"] = json!(temperature);
        }
        json!({
            "contents": [{"role": "user", "parts": [{"text": prompt}]}],
            "generationConfig": generation_config,
        })
    }

    /// Extract the first text part of the first candidate.
    fn extract_text(resp: GeminiApiResponse) -> Result<String> {
        let candidate = resp
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Gemini response had no candidates"))?;

        candidate
            .content
            .parts
            .into_iter()
            .find_map(|part| part.text)
            .ok_or_else(|| anyhow!("Gemini response had no text parts"))
    }
}

#[async_trait]
impl TextProvider for GoogleProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Google
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}?key={}", self.endpoint(), self.api_key);
        let body = self.request_body(prompt);

        debug!("Gemini request: model={}", self.config.model);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .context("Failed to send request to Gemini API")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow!(
                "Gemini API request failed with status {}: {}",
                status,
                error_text
            ));
        }

        let api_response: GeminiApiResponse = response
            .json()
            .await
            .context("Failed to parse Gemini API response")?;

        debug!(
            "Gemini response: candidates={}",
            api_response.candidates.len()
        );

        Self::extract_text(api_response)
    }
}

// ── Gemini wire types ──

#[derive(Debug, Clone, Deserialize)]
struct GeminiApiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Clone, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Debug, Clone, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(config: ProviderConfig) -> GoogleProvider {
        GoogleProvider::new("AIza-test".to_string(), config)
    }

    #[test]
    fn test_endpoint() {
        let p = provider(ProviderConfig::defaults(ProviderId::Google));
        assert_eq!(
            p.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_request_body_minimal() {
        let p = provider(ProviderConfig::defaults(ProviderId::Google));
        let body = p.request_body("hello");
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert!(body["generationConfig"].get("temperature").is_none());
    }

    #[test]
    fn test_request_body_with_params() {
        let mut config = ProviderConfig::defaults(ProviderId::Google);
        config.max_tokens = Some(256);
        config.temperature = Some(0.9);
        let body = provider(config).request_body("hi");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 256);
        assert!(body["generationConfig"].get("temperature").is_some());
    }

    #[test]
    fn test_extract_text() {
        let resp: GeminiApiResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Hello!"}]}
            }]
        }))
        .unwrap();
        assert_eq!(GoogleProvider::extract_text(resp).unwrap(), "Hello!");
    }

    #[test]
    fn test_extract_text_no_candidates() {
        let resp: GeminiApiResponse = serde_json::from_value(json!({})).unwrap();
        assert!(GoogleProvider::extract_text(resp).is_err());
    }

    #[test]
    fn test_extract_text_no_text_parts() {
        let resp: GeminiApiResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"functionCall": {"name": "x"}}]}}]
        }))
        .unwrap();
        assert!(GoogleProvider::extract_text(resp).is_err());
    }

    #[test]
    fn test_debug_hides_key() {
        let p = provider(ProviderConfig::defaults(ProviderId::Google));
        let debug = format!("{:?}", p);
        assert!(!debug.contains("AIza-test"));
    }
}
