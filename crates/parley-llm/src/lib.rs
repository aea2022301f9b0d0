pub mod types;
pub mod traits;
pub mod config;
pub mod openai;
pub mod anthropic;

pub use traits::{ChatClient, ChatRequest, ChatResponse, ChatOptions, TokenUsage};
pub use openai::OpenAIClient;
pub use anthropic::AnthropicClient;
pub use config::{ClientFactory, ProviderConfig, ProviderType};
pub use types::Message;
