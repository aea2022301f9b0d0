use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use parley_answer::ProviderSettings;
use parley_llm::{ProviderConfig, ProviderType};
use parley_source::{FetchPolicy, DEFAULT_BASE_URL};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(skip)]
    pub groq_api_key: Option<String>,
    #[serde(skip)]
    pub anthropic_api_key: Option<String>,
    #[serde(skip)]
    pub openai_api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    pub enabled: bool,
    #[serde(default)]
    pub origins: Vec<String>,
}

/// Remote message API and pagination policy
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub base_url: String,
    pub page_size: usize,
    pub max_retries: u32,
    pub max_consecutive_failures: u32,
    /// Per-HTTP-call timeout
    pub timeout_secs: u64,
    pub retry_backoff_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        let policy = FetchPolicy::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: policy.page_size,
            max_retries: policy.max_retries,
            max_consecutive_failures: policy.max_consecutive_failures,
            timeout_secs: 30,
            retry_backoff_ms: policy.retry_backoff.as_millis() as u64,
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl From<&SourceConfig> for FetchPolicy {
    fn from(config: &SourceConfig) -> Self {
        FetchPolicy::new()
            .page_size(config.page_size)
            .max_retries(config.max_retries)
            .max_consecutive_failures(config.max_consecutive_failures)
            .retry_backoff(Duration::from_millis(config.retry_backoff_ms))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub groq: ProviderSection,
    #[serde(default)]
    pub claude: ProviderSection,
    #[serde(default)]
    pub openai: ProviderSection,
}

impl ProvidersConfig {
    pub fn section(&self, provider: ProviderType) -> &ProviderSection {
        match provider {
            ProviderType::Groq => &self.groq,
            ProviderType::Anthropic => &self.claude,
            ProviderType::OpenAI => &self.openai,
        }
    }
}

/// Overrides on top of the provider's built-in settings; unset fields keep the default
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderSection {
    pub models: Option<Vec<String>>,
    pub context_budget: Option<usize>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub base_url: Option<String>,
}

impl ProviderSection {
    pub fn settings(&self, provider: ProviderType) -> ProviderSettings {
        let mut settings = ProviderSettings::defaults_for(provider);
        if let Some(models) = self.models.as_ref().filter(|models| !models.is_empty()) {
            settings.models = models.clone();
        }
        if let Some(budget) = self.context_budget {
            settings.context_budget = budget;
        }
        if let Some(temperature) = self.temperature {
            settings.temperature = temperature;
        }
        if let Some(max_tokens) = self.max_tokens {
            settings.max_tokens = max_tokens;
        }
        settings
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables, e.g. `PARLEY__SERVER__PORT=9000`
    ///
    /// Provider keys are read from `GROQ_API_KEY`, `ANTHROPIC_API_KEY` and
    /// `OPENAI_API_KEY`; each one is optional.
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("PARLEY")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut cfg: Config = builder.build()?.try_deserialize()?;
        cfg.load_api_keys();

        Ok(cfg)
    }

    fn load_api_keys(&mut self) {
        let key = |provider: ProviderType| ProviderConfig::from_env(provider).map(|c| c.api_key);
        self.groq_api_key = key(ProviderType::Groq);
        self.anthropic_api_key = key(ProviderType::Anthropic);
        self.openai_api_key = key(ProviderType::OpenAI);
    }

    pub fn api_key(&self, provider: ProviderType) -> Option<&str> {
        match provider {
            ProviderType::Groq => self.groq_api_key.as_deref(),
            ProviderType::Anthropic => self.anthropic_api_key.as_deref(),
            ProviderType::OpenAI => self.openai_api_key.as_deref(),
        }
    }

    /// Provider configs for every key present, in priority order
    pub fn provider_configs(&self) -> Vec<(ProviderConfig, ProviderSettings)> {
        ProviderType::PRIORITY
            .into_iter()
            .filter_map(|provider| {
                let api_key = self.api_key(provider)?;
                let section = self.providers.section(provider);
                let mut config = ProviderConfig::new(provider, api_key);
                if let Some(base_url) = &section.base_url {
                    config = config.with_base_url(base_url.clone());
                }
                Some((config, section.settings(provider)))
            })
            .collect()
    }
}
