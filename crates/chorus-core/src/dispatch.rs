//! Provider dispatcher: route a prompt to one provider, or fan it out to all

use tracing::{info, warn};

use crate::providers::{
    ProviderConfig, ProviderId, TextProvider, anthropic::AnthropicProvider,
    google::GoogleProvider, openai::OpenAiProvider,
};

/// Per-provider generation parameters handed to [`Dispatcher::from_env`].
#[derive(Debug, Clone)]
pub struct DispatcherSettings {
    pub openai: ProviderConfig,
    pub anthropic: ProviderConfig,
    pub google: ProviderConfig,
}

impl Default for DispatcherSettings {
    fn default() -> Self {
        Self {
            openai: ProviderConfig::defaults(ProviderId::OpenAi),
            anthropic: ProviderConfig::defaults(ProviderId::Anthropic),
            google: ProviderConfig::defaults(ProviderId::Google),
        }
    }
}

/// Routes prompts to provider handles. One slot per provider; a slot is
/// filled at construction iff that provider's credential was present,
/// and never mutated afterward.
pub struct Dispatcher {
    openai: Option<Box<dyn TextProvider>>,
    anthropic: Option<Box<dyn TextProvider>>,
    google: Option<Box<dyn TextProvider>>,
}

impl Dispatcher {
    /// Build a dispatcher from explicit handles. Mainly for tests; use
    /// [`Dispatcher::from_env`] in the binary.
    pub fn new(
        openai: Option<Box<dyn TextProvider>>,
        anthropic: Option<Box<dyn TextProvider>>,
        google: Option<Box<dyn TextProvider>>,
    ) -> Self {
        Self {
            openai,
            anthropic,
            google,
        }
    }

    /// Build a dispatcher by reading each provider's credential env var.
    /// Providers whose credential is absent or empty are skipped.
    pub fn from_env(settings: &DispatcherSettings) -> Self {
        let openai = credential(ProviderId::OpenAi).map(|key| {
            Box::new(OpenAiProvider::new(key, settings.openai.clone())) as Box<dyn TextProvider>
        });
        let anthropic = credential(ProviderId::Anthropic).map(|key| {
            Box::new(AnthropicProvider::new(key, settings.anthropic.clone()))
                as Box<dyn TextProvider>
        });
        let google = credential(ProviderId::Google).map(|key| {
            Box::new(GoogleProvider::new(key, settings.google.clone())) as Box<dyn TextProvider>
        });

        let dispatcher = Self::new(openai, anthropic, google);
        for id in ProviderId::ALL {
            if let Some(provider) = dispatcher.slot(id) {
                info!("{} initialized (model: {})", id.display_name(), provider.model());
            } else {
                info!("{} not configured ({} not set)", id.display_name(), id.env_key());
            }
        }
        dispatcher
    }

    fn slot(&self, id: ProviderId) -> Option<&dyn TextProvider> {
        match id {
            ProviderId::OpenAi => self.openai.as_deref(),
            ProviderId::Anthropic => self.anthropic.as_deref(),
            ProviderId::Google => self.google.as_deref(),
        }
    }

    /// Whether a handle exists for this provider.
    pub fn is_configured(&self, id: ProviderId) -> bool {
        self.slot(id).is_some()
    }

    /// Initialization status per provider, in fixed order.
    pub fn configured(&self) -> Vec<(ProviderId, bool)> {
        ProviderId::ALL
            .into_iter()
            .map(|id| (id, self.is_configured(id)))
            .collect()
    }

    /// Generate text with one provider. Returns `None` without touching
    /// the network when the provider has no handle, and `None` (after
    /// logging) when the call fails. No retries.
    pub async fn generate(&self, prompt: &str, id: ProviderId) -> Option<String> {
        let provider = match self.slot(id) {
            Some(p) => p,
            None => {
                warn!("{} is not configured, skipping", id);
                return None;
            }
        };

        match provider.generate(prompt).await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("{} ({}) failed: {:#}", id, provider.model(), e);
                None
            }
        }
    }

    /// Fan a prompt out to every known provider, sequentially, in
    /// [`ProviderId::ALL`] order. Always yields exactly one entry per
    /// provider; one provider's failure never blocks the others.
    pub async fn generate_all(&self, prompt: &str) -> Vec<(ProviderId, Option<String>)> {
        let mut results = Vec::with_capacity(ProviderId::ALL.len());
        for id in ProviderId::ALL {
            info!("Asking {}...", id.display_name());
            let outcome = self.generate(prompt, id).await;
            results.push((id, outcome));
        }
        results
    }
}

/// Read a provider's API key from the environment, treating empty as unset.
fn credential(id: ProviderId) -> Option<String> {
    std::env::var(id.env_key())
        .ok()
        .filter(|key| !key.is_empty())
}
