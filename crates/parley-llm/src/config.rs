// Configuration layer for provider-agnostic LLM client creation
// This module provides a factory pattern for creating chat clients from configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::anthropic::AnthropicClient;
use crate::openai::OpenAIClient;
use crate::traits::ChatClient;

/// Type of LLM provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    Groq,
    #[serde(rename = "claude")]
    Anthropic,
    OpenAI,
}

impl ProviderType {
    /// Priority order used when several credentials are present
    pub const PRIORITY: [ProviderType; 3] = [Self::Groq, Self::Anthropic, Self::OpenAI];

    /// Short identifier used in config sections and health output
    pub fn id(&self) -> &'static str {
        match self {
            Self::Groq => "groq",
            Self::Anthropic => "claude",
            Self::OpenAI => "openai",
        }
    }

    /// Environment variable holding this provider's API key
    pub fn api_key_var(&self) -> &'static str {
        match self {
            Self::Groq => "GROQ_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::OpenAI => "OPENAI_API_KEY",
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Groq => "Groq",
            Self::Anthropic => "Claude",
            Self::OpenAI => "OpenAI",
        };
        f.write_str(label)
    }
}

/// Complete provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub provider: ProviderType,
    pub api_key: String,
    /// Override for the provider's API base URL (tests, proxies)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl ProviderConfig {
    pub fn new(provider: ProviderType, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
            base_url: None,
        }
    }

    pub fn groq(api_key: impl Into<String>) -> Self {
        Self::new(ProviderType::Groq, api_key)
    }

    pub fn anthropic(api_key: impl Into<String>) -> Self {
        Self::new(ProviderType::Anthropic, api_key)
    }

    pub fn openai(api_key: impl Into<String>) -> Self {
        Self::new(ProviderType::OpenAI, api_key)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Read the provider's key from the environment; blank values count as absent
    pub fn from_env(provider: ProviderType) -> Option<Self> {
        std::env::var(provider.api_key_var())
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(|key| Self::new(provider, key))
    }

    pub fn provider_type(&self) -> ProviderType {
        self.provider
    }
}

/// Factory for creating chat clients from configuration
pub struct ClientFactory;

impl ClientFactory {
    pub fn create_chat_client(config: ProviderConfig) -> Result<Arc<dyn ChatClient>> {
        match config.provider {
            ProviderType::Groq => {
                let mut client = OpenAIClient::groq(config.api_key)?;
                if let Some(base_url) = config.base_url {
                    client = client.with_base_url(base_url);
                }
                Ok(Arc::new(client))
            }
            ProviderType::OpenAI => {
                let mut client = OpenAIClient::new(config.api_key)?;
                if let Some(base_url) = config.base_url {
                    client = client.with_base_url(base_url);
                }
                Ok(Arc::new(client))
            }
            ProviderType::Anthropic => {
                let mut client = AnthropicClient::new(config.api_key)?;
                if let Some(base_url) = config.base_url {
                    client = client.with_base_url(base_url);
                }
                Ok(Arc::new(client))
            }
        }
    }
}
