//! Provider-agnostic types for multi-provider text generation

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The closed set of supported providers, in fan-out order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    OpenAi,
    Anthropic,
    Google,
}

impl ProviderId {
    /// All providers, in the order `generate_all` visits them.
    pub const ALL: [ProviderId; 3] = [Self::OpenAi, Self::Anthropic, Self::Google];

    /// Stable identifier used on the CLI and in result maps.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Google => "google",
        }
    }

    /// Human-readable name for status output.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::OpenAi => "OpenAI",
            Self::Anthropic => "Anthropic",
            Self::Google => "Google Gemini",
        }
    }

    /// Environment variable holding this provider's API key.
    pub fn env_key(&self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::Google => "GOOGLE_API_KEY",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            "google" | "gemini" => Ok(Self::Google),
            other => Err(anyhow::anyhow!(
                "unknown provider '{}' (expected one of: openai, anthropic, google)",
                other
            )),
        }
    }
}

/// Generation parameters for one provider. Built once at startup,
/// never mutated afterward.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub model: String,
    pub base_url: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl ProviderConfig {
    /// Default parameters for a provider.
    pub fn defaults(id: ProviderId) -> Self {
        let (model, base_url) = match id {
            ProviderId::OpenAi => ("gpt-4o", "https://api.openai.com"),
            ProviderId::Anthropic => ("claude-sonnet-4-20250514", "https://api.anthropic.com"),
            ProviderId::Google => (
                "gemini-2.0-flash",
                "https://generativelanguage.googleapis.com/v1beta",
            ),
        };
        Self {
            model: model.to_string(),
            base_url: base_url.to_string(),
            temperature: None,
            max_tokens: None,
        }
    }
}

/// Trait that all providers implement: one prompt in, one text out.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Which provider this handle talks to.
    fn id(&self) -> ProviderId;

    /// Model identifier (e.g. "gpt-4o", "gemini-2.0-flash").
    fn model(&self) -> &str;

    /// Issue exactly one request to the provider's generation endpoint
    /// and return the first textual response field.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_id_display() {
        assert_eq!(ProviderId::OpenAi.to_string(), "openai");
        assert_eq!(ProviderId::Anthropic.to_string(), "anthropic");
        assert_eq!(ProviderId::Google.to_string(), "google");
    }

    #[test]
    fn test_provider_id_order() {
        assert_eq!(
            ProviderId::ALL,
            [
                ProviderId::OpenAi,
                ProviderId::Anthropic,
                ProviderId::Google
            ]
        );
    }

    #[test]
    fn test_provider_id_from_str() {
        assert_eq!("openai".parse::<ProviderId>().unwrap(), ProviderId::OpenAi);
        assert_eq!(
            "Anthropic".parse::<ProviderId>().unwrap(),
            ProviderId::Anthropic
        );
        assert_eq!("gemini".parse::<ProviderId>().unwrap(), ProviderId::Google);
    }

    #[test]
    fn test_provider_id_from_str_unknown() {
        let err = "mistral".parse::<ProviderId>().unwrap_err();
        assert!(err.to_string().contains("unknown provider"));
    }

    #[test]
    fn test_env_keys() {
        assert_eq!(ProviderId::OpenAi.env_key(), "OPENAI_API_KEY");
        assert_eq!(ProviderId::Anthropic.env_key(), "ANTHROPIC_API_KEY");
        assert_eq!(ProviderId::Google.env_key(), "GOOGLE_API_KEY");
    }

    #[test]
    fn test_default_config() {
        let cfg = ProviderConfig::defaults(ProviderId::OpenAi);
        assert_eq!(cfg.model, "gpt-4o");
        assert!(cfg.temperature.is_none());
        assert!(cfg.max_tokens.is_none());
    }
}
