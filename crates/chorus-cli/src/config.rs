//! Optional config file: per-provider model and generation parameters.
//!
//! Credentials never live here; they are read from the environment at
//! startup. A missing config file just means defaults.

use anyhow::{Context, Result};
use chorus_core::dispatch::DispatcherSettings;
use chorus_core::providers::{ProviderConfig, ProviderId};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChorusConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub openai: ProviderOverrides,
    #[serde(default)]
    pub anthropic: ProviderOverrides,
    #[serde(default)]
    pub google: ProviderOverrides,
}

/// Fields a user may override per provider; anything unset keeps the
/// built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderOverrides {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl ProviderOverrides {
    fn apply(&self, id: ProviderId) -> ProviderConfig {
        let mut config = ProviderConfig::defaults(id);
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        config.temperature = self.temperature.or(config.temperature);
        config.max_tokens = self.max_tokens.or(config.max_tokens);
        config
    }
}

impl ChorusConfig {
    /// Load from the given path, or `~/.config/chorus/config.toml`.
    /// A missing file yields the defaults.
    pub fn load(custom_path: &Option<PathBuf>) -> Result<Self> {
        let path = custom_path
            .clone()
            .unwrap_or_else(|| config_dir().join("config.toml"));

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config at {}", path.display()))
    }

    /// Resolve overrides into the dispatcher's settings.
    pub fn settings(&self) -> DispatcherSettings {
        DispatcherSettings {
            openai: self.providers.openai.apply(ProviderId::OpenAi),
            anthropic: self.providers.anthropic.apply(ProviderId::Anthropic),
            google: self.providers.google.apply(ProviderId::Google),
        }
    }
}

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chorus")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_yields_defaults() {
        let path = Some(PathBuf::from("/nonexistent/chorus-config.toml"));
        let cfg = ChorusConfig::load(&path).unwrap();
        let settings = cfg.settings();
        assert_eq!(settings.openai.model, "gpt-4o");
        assert!(settings.google.temperature.is_none());
    }

    #[test]
    fn test_parse_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[providers.openai]
model = "gpt-4o-mini"
temperature = 0.3

[providers.google]
max_tokens = 256
"#
        )
        .unwrap();

        let cfg = ChorusConfig::load(&Some(file.path().to_path_buf())).unwrap();
        let settings = cfg.settings();
        assert_eq!(settings.openai.model, "gpt-4o-mini");
        assert_eq!(settings.openai.temperature, Some(0.3));
        assert_eq!(settings.google.max_tokens, Some(256));
        // untouched provider keeps defaults
        assert_eq!(settings.anthropic.model, "claude-sonnet-4-20250514");
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "providers = 42").unwrap();
        assert!(ChorusConfig::load(&Some(file.path().to_path_buf())).is_err());
    }
}
