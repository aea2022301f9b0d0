use anyhow::Result;
use std::sync::Arc;

use parley_context::{COMPACT_CONTEXT_BUDGET, FULL_CONTEXT_BUDGET};
use parley_llm::{ChatClient, ChatOptions, ClientFactory, ProviderConfig, ProviderType};

/// Per-provider request shape: which models to try and how much context to send
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    /// Model identifiers in preference order; the first one that accepts the call wins
    pub models: Vec<String>,
    /// Context budget in characters
    pub context_budget: usize,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ProviderSettings {
    pub fn defaults_for(provider: ProviderType) -> Self {
        match provider {
            ProviderType::Groq => Self {
                models: vec!["llama-3.3-70b-versatile".to_string()],
                context_budget: COMPACT_CONTEXT_BUDGET,
                temperature: 0.7,
                max_tokens: 1024,
            },
            ProviderType::Anthropic => Self {
                models: [
                    "claude-3-5-sonnet-20241022",
                    "claude-3-5-sonnet-20240620",
                    "claude-3-5-sonnet",
                    "claude-3-opus-20240229",
                    "claude-3-sonnet-20240229",
                    "claude-3-haiku-20240307",
                ]
                .into_iter()
                .map(String::from)
                .collect(),
                context_budget: FULL_CONTEXT_BUDGET,
                temperature: 0.7,
                max_tokens: 2048,
            },
            ProviderType::OpenAI => Self {
                models: vec!["gpt-3.5-turbo".to_string()],
                context_budget: FULL_CONTEXT_BUDGET,
                temperature: 0.7,
                max_tokens: 500,
            },
        }
    }

    pub fn chat_options(&self) -> ChatOptions {
        ChatOptions::new()
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
    }
}

/// One configured backend in the chain
#[derive(Clone)]
pub struct ProviderSlot {
    pub provider: ProviderType,
    pub client: Arc<dyn ChatClient>,
    pub settings: ProviderSettings,
}

impl ProviderSlot {
    pub fn new(provider: ProviderType, client: Arc<dyn ChatClient>, settings: ProviderSettings) -> Self {
        Self {
            provider,
            client,
            settings,
        }
    }
}

/// Immutable, priority-ordered list of configured providers.
///
/// Built once at startup from whichever credentials are present and shared
/// read-only by every request. An empty chain means every question is
/// answered by local keyword search.
#[derive(Clone, Default)]
pub struct ProviderChain {
    slots: Vec<ProviderSlot>,
}

impl ProviderChain {
    /// Slots are tried in the order given
    pub fn new(slots: Vec<ProviderSlot>) -> Self {
        Self { slots }
    }

    /// Build clients for each config and order them by provider priority
    pub fn from_configs(configs: Vec<(ProviderConfig, ProviderSettings)>) -> Result<Self> {
        let mut slots = configs
            .into_iter()
            .map(|(config, settings)| {
                let provider = config.provider_type();
                let client = ClientFactory::create_chat_client(config)?;
                Ok(ProviderSlot::new(provider, client, settings))
            })
            .collect::<Result<Vec<_>>>()?;

        slots.sort_by_key(|slot| priority(slot.provider));
        slots.dedup_by_key(|slot| slot.provider);

        Ok(Self { slots })
    }

    pub fn slots(&self) -> &[ProviderSlot] {
        &self.slots
    }

    /// The provider every request tries first
    pub fn active(&self) -> Option<ProviderType> {
        self.slots.first().map(|slot| slot.provider)
    }

    pub fn is_configured(&self, provider: ProviderType) -> bool {
        self.slots.iter().any(|slot| slot.provider == provider)
    }
}

fn priority(provider: ProviderType) -> usize {
    ProviderType::PRIORITY
        .iter()
        .position(|p| *p == provider)
        .unwrap_or(ProviderType::PRIORITY.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groq_uses_compact_budget() {
        let settings = ProviderSettings::defaults_for(ProviderType::Groq);
        assert_eq!(settings.context_budget, COMPACT_CONTEXT_BUDGET);
        assert_eq!(settings.max_tokens, 1024);
    }

    #[test]
    fn test_claude_models_in_preference_order() {
        let settings = ProviderSettings::defaults_for(ProviderType::Anthropic);
        assert_eq!(settings.models.len(), 6);
        assert_eq!(settings.models[0], "claude-3-5-sonnet-20241022");
        assert_eq!(settings.models[5], "claude-3-haiku-20240307");
        assert_eq!(settings.context_budget, FULL_CONTEXT_BUDGET);
    }

    #[test]
    fn test_chat_options_from_settings() {
        let options = ProviderSettings::defaults_for(ProviderType::OpenAI).chat_options();
        assert_eq!(options.temperature, Some(0.7));
        assert_eq!(options.max_tokens, Some(500));
    }

    #[test]
    fn test_from_configs_orders_by_priority() {
        let chain = ProviderChain::from_configs(vec![
            (
                ProviderConfig::openai("k1"),
                ProviderSettings::defaults_for(ProviderType::OpenAI),
            ),
            (
                ProviderConfig::groq("k2"),
                ProviderSettings::defaults_for(ProviderType::Groq),
            ),
        ])
        .unwrap();

        let order: Vec<ProviderType> = chain.slots().iter().map(|s| s.provider).collect();
        assert_eq!(order, vec![ProviderType::Groq, ProviderType::OpenAI]);
        assert_eq!(chain.active(), Some(ProviderType::Groq));
        assert!(!chain.is_configured(ProviderType::Anthropic));
    }

    #[test]
    fn test_empty_chain() {
        let chain = ProviderChain::default();
        assert!(chain.slots().is_empty());
        assert_eq!(chain.active(), None);
    }
}
